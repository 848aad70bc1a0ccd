use rand::{distributions::Alphanumeric, thread_rng, Rng};

/// Six decimal digits, mailed to the user for second-factor sign in.
pub fn numeric_code() -> String {
    thread_rng().gen_range(100000..=999999).to_string()
}

/// Opaque token embedded in emailed links.
pub fn url_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}
