pub(crate) mod auth_callback;
