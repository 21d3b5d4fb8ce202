//! Post-authentication redirect classification.
//!
//! When a user returns from the identity provider (or clicks an emailed
//! recovery/confirmation link) they land on the application's entry path with
//! an access token delivered in the URL fragment or query string. This module
//! inspects that location and decides which screen the browser should be sent
//! to. It only looks at token *presence and declared type*; validating the
//! token is the destination screen's job.

use log::*;
use std::collections::HashMap;

/// Destination for `type=recovery` callbacks.
pub const RESET_PASSWORD_PATH: &str = "/reset-password";
/// Destination for all other authenticated callbacks, including `type=signup`.
pub const LOGIN_PATH: &str = "/login";

/// Read-only snapshot of a navigable location, taken at evaluation time.
///
/// `search` and `hash` are stored raw (percent-encoding intact, leading
/// `?`/`#` stripped) so a redirect can carry them verbatim; key/value views
/// are derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    path: String,
    search: String,
    hash: String,
}

impl Location {
    pub fn new(path: &str, search: &str, hash: &str) -> Self {
        Self {
            path: path.to_string(),
            search: search.strip_prefix('?').unwrap_or(search).to_string(),
            hash: hash.strip_prefix('#').unwrap_or(hash).to_string(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    fn query_params(&self) -> HashMap<String, String> {
        parse_params(&self.search)
    }

    fn fragment_params(&self) -> HashMap<String, String> {
        parse_params(&self.hash)
    }
}

/// Parses a raw query or fragment string into a key/value map.
///
/// Malformed pairs (no `=`, undecodable percent-escapes) are skipped rather
/// than treated as errors. For duplicated keys the first occurrence wins.
fn parse_params(raw: &str) -> HashMap<String, String> {
    let mut params = HashMap::new();
    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let (Ok(key), Ok(value)) = (urlencoding::decode(key), urlencoding::decode(value)) else {
            continue;
        };
        params
            .entry(key.into_owned())
            .or_insert_with(|| value.into_owned());
    }
    params
}

/// Declared purpose of an access token, as tagged by the identity provider.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    Recovery,
    Signup,
    Other(String),
}

impl From<&str> for TokenType {
    fn from(tag: &str) -> Self {
        match tag {
            "recovery" => TokenType::Recovery,
            "signup" => TokenType::Signup,
            other => TokenType::Other(other.to_string()),
        }
    }
}

/// The token-bearing parameters of a callback location, merged from the
/// fragment and the query string.
///
/// Fragment values win over query values for the same key: identity providers
/// deliver tokens in the fragment (never sent to servers) while some flows
/// use query parameters, and the less private channel must not shadow the
/// fragment when both are present.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenBundle {
    access_token: Option<String>,
    token_type: Option<TokenType>,
}

impl TokenBundle {
    pub fn from_location(location: &Location) -> Self {
        let fragment = location.fragment_params();
        let query = location.query_params();

        let access_token = fragment
            .get("access_token")
            .or_else(|| query.get("access_token"))
            .cloned();
        let token_type = fragment
            .get("type")
            .or_else(|| query.get("type"))
            .map(|tag| TokenType::from(tag.as_str()));

        Self {
            access_token,
            token_type,
        }
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn token_type(&self) -> Option<&TokenType> {
        self.token_type.as_ref()
    }
}

/// The outcome of classifying a location.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingDecision {
    Redirect {
        path: &'static str,
        preserve_fragment: bool,
    },
    NoAction,
}

impl RoutingDecision {
    /// Builds the full redirect target for this decision, or `None` for
    /// `NoAction`.
    ///
    /// With `preserve_fragment` set, the original fragment is carried verbatim
    /// (not re-encoded) because the destination screen re-parses it to extract
    /// the token. When the token arrived only via the query string the original
    /// query is carried instead.
    pub fn target(&self, location: &Location) -> Option<String> {
        match self {
            RoutingDecision::Redirect {
                path,
                preserve_fragment,
            } => {
                let mut target = (*path).to_string();
                if *preserve_fragment {
                    if !location.hash().is_empty() {
                        target.push('#');
                        target.push_str(location.hash());
                    } else if !location.search().is_empty() {
                        target.push('?');
                        target.push_str(location.search());
                    }
                }
                Some(target)
            }
            RoutingDecision::NoAction => None,
        }
    }
}

/// Classifies post-authentication callback locations into routing decisions.
///
/// One instance corresponds to one mount of the hosting lifecycle. The
/// `evaluated` flag suppresses duplicate evaluation within a single mount
/// (hosting lifecycles may invoke the check twice for one logical navigation,
/// and a second redirect attempt would risk a redirect loop). The flag is
/// instance-local, never process-wide; a fresh mount starts unevaluated.
#[derive(Debug, Clone)]
pub struct AuthCallbackRouter {
    entry_path: String,
    evaluated: bool,
}

impl AuthCallbackRouter {
    pub fn new(entry_path: &str) -> Self {
        Self {
            entry_path: entry_path.to_string(),
            evaluated: false,
        }
    }

    /// Classifies `location` without touching the mount guard. Pure: the
    /// decision is recomputed from the location on every call and never errors,
    /// worst case it falls through to `NoAction`.
    pub fn evaluate(&self, location: &Location) -> RoutingDecision {
        if location.path() != self.entry_path {
            return RoutingDecision::NoAction;
        }

        let tokens = TokenBundle::from_location(location);
        if tokens.access_token().is_none() {
            trace!("No access token present at entry path, no action");
            return RoutingDecision::NoAction;
        }

        match tokens.token_type() {
            Some(TokenType::Recovery) => {
                debug!("Recovery token callback, routing to {RESET_PASSWORD_PATH}");
                RoutingDecision::Redirect {
                    path: RESET_PASSWORD_PATH,
                    preserve_fragment: true,
                }
            }
            Some(TokenType::Signup) => {
                debug!("Signup confirmation callback, routing to {LOGIN_PATH}");
                RoutingDecision::Redirect {
                    path: LOGIN_PATH,
                    preserve_fragment: true,
                }
            }
            other => {
                // Unrecognized or missing type tags take the generic branch
                debug!("Generic authenticated callback (type {other:?}), routing to {LOGIN_PATH}");
                RoutingDecision::Redirect {
                    path: LOGIN_PATH,
                    preserve_fragment: true,
                }
            }
        }
    }

    /// Classifies `location` at most once per mount. A second call on the
    /// same instance returns `NoAction` until `reset` is called.
    pub fn evaluate_once(&mut self, location: &Location) -> RoutingDecision {
        if self.evaluated {
            trace!("Callback already evaluated for this mount, suppressing");
            return RoutingDecision::NoAction;
        }

        let decision = self.evaluate(location);
        if location.path() == self.entry_path {
            self.evaluated = true;
        }
        decision
    }

    /// Re-arms the mount guard, as happens when the owning lifecycle is
    /// re-initialized for a new navigation.
    pub fn reset(&mut self) {
        self.evaluated = false;
    }
}
