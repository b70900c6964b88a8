//! Disposable email domain denylist.
//!
//! Domains that hand out throwaway mailboxes. Matching is case-insensitive
//! and covers subdomains of a listed domain (`x.mailinator.com`).

use std::collections::HashSet;
use std::sync::LazyLock;

const DISPOSABLE_DOMAINS: &[&str] = &[
    "0-mail.com",
    "10minutemail.com",
    "10minutemail.net",
    "20minutemail.com",
    "33mail.com",
    "discard.email",
    "dispostable.com",
    "emailondeck.com",
    "fakeinbox.com",
    "getairmail.com",
    "getnada.com",
    "guerrillamail.biz",
    "guerrillamail.com",
    "guerrillamail.de",
    "guerrillamail.info",
    "guerrillamail.net",
    "guerrillamail.org",
    "guerrillamailblock.com",
    "harakirimail.com",
    "incognitomail.org",
    "mailcatch.com",
    "maildrop.cc",
    "mailinator.com",
    "mailinator.net",
    "mailnesia.com",
    "mintemail.com",
    "mohmal.com",
    "moakt.com",
    "mytemp.email",
    "sharklasers.com",
    "spam4.me",
    "spamgourmet.com",
    "temp-mail.io",
    "temp-mail.org",
    "tempail.com",
    "tempmail.com",
    "tempmail.net",
    "tempmailo.com",
    "tempr.email",
    "throwawaymail.com",
    "trashmail.com",
    "trashmail.de",
    "trashmail.net",
    "yopmail.com",
    "yopmail.fr",
    "yopmail.net",
];

static DISPOSABLE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| DISPOSABLE_DOMAINS.iter().copied().collect());

/// Check whether `domain` (or any parent domain of it) is disposable.
///
/// `extra` extends the built-in list; its entries are compared
/// case-insensitively as well.
pub fn is_disposable_domain(domain: &str, extra: &[String]) -> bool {
    let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    if domain.is_empty() {
        return false;
    }

    // "a.b.mailinator.com" -> "a.b.mailinator.com", "b.mailinator.com", "mailinator.com", "com"
    let mut candidate = domain.as_str();
    loop {
        if DISPOSABLE_SET.contains(candidate)
            || extra.iter().any(|e| e.trim().eq_ignore_ascii_case(candidate))
        {
            return true;
        }
        match candidate.split_once('.') {
            Some((_, parent)) if !parent.is_empty() => candidate = parent,
            _ => return false,
        }
    }
}
