use rand::Rng;

/// Length of generated object keys
pub const KEY_LENGTH: usize = 10;

/// URL-safe alphabet, 64 symbols
const KEY_ALPHABET: &[u8; 64] =
    b"useandom-26T198340PX75pxJACKVERYMINDBUSHWOLF_GQZbfghjklqvwyzrict";

/// Generates a random 10-character object key.
///
/// 60 bits of entropy from the thread-local CSPRNG; safe to embed in URLs.
#[must_use]
pub fn generate_key() -> String {
    let mut rng = rand::thread_rng();
    (0..KEY_LENGTH)
        .map(|_| char::from(KEY_ALPHABET[rng.gen_range(0..KEY_ALPHABET.len())]))
        .collect()
}
