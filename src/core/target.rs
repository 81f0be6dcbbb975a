use crate::utils::validation::TEMPLATE_PLACEHOLDER;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters gets escaped.
const USERNAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode_username(username: &str) -> String {
    utf8_percent_encode(username, USERNAME_ENCODE_SET).to_string()
}

/// Encodes `username` and puts it in place of the template's placeholder.
/// Only the first placeholder is replaced; catalogs are validated to carry
/// exactly one.
pub fn build_profile_url(url_template: &str, username: &str) -> String {
    url_template.replacen(TEMPLATE_PLACEHOLDER, &encode_username(username), 1)
}
