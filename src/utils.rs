use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use pbkdf2::pbkdf2_hmac;
use rand::{Rng, distr::Alphanumeric};
use sha2::Sha256;
use subtle::ConstantTimeEq;

const PASSWORD_SALT_LEN: usize = 16;
const PASSWORD_SCHEME: &str = "pbkdf2:sha256";
const PASSWORD_DIGEST_LEN: usize = 32;

/// PBKDF2 rounds for newly hashed passwords. The count is stored with every
/// hash, so raising it only affects new hashes.
pub const PASSWORD_ITERATIONS: u32 = 600_000;

/// Random alphanumeric string, used for session tokens and password salts.
pub fn generate_token(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn derive(password: &str, salt: &str, iterations: u32) -> [u8; PASSWORD_DIGEST_LEN] {
    let mut key = [0u8; PASSWORD_DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt.as_bytes(), iterations, &mut key);
    key
}

/// Hashes a password as `pbkdf2:sha256:<iterations>$<salt>$<digest>`.
pub fn hash_password(password: &str) -> String {
    hash_password_with_iterations(password, PASSWORD_ITERATIONS)
}

pub fn hash_password_with_iterations(password: &str, iterations: u32) -> String {
    let salt = generate_token(PASSWORD_SALT_LEN);
    let digest = derive(password, &salt, iterations);
    format!(
        "{}:{}${}${}",
        PASSWORD_SCHEME,
        iterations,
        salt,
        URL_SAFE_NO_PAD.encode(digest)
    )
}

/// Checks `password` against a stored hash. Digests are compared in
/// constant time.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(method), Some(salt), Some(expected)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let Some(iterations) = method
        .strip_prefix(PASSWORD_SCHEME)
        .and_then(|rest| rest.strip_prefix(':'))
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| *n > 0)
    else {
        return false;
    };

    let Ok(expected) = URL_SAFE_NO_PAD.decode(expected) else {
        return false;
    };
    if expected.len() != PASSWORD_DIGEST_LEN {
        return false;
    }

    let actual = derive(password, salt, iterations);
    actual.as_slice().ct_eq(expected.as_slice()).into()
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Reads a single cookie value out of a `Cookie` request header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}
