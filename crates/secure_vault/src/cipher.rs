//! Repeating-key XOR cipher.
//!
//! This is obfuscation, not real cryptography: the scheme exists so vault
//! payloads are never stored or surfaced as plaintext, and so a wrong
//! password yields garbage instead of content. XOR runs over UTF-8 bytes
//! with the key cycled; ciphertext bytes are widened one-to-one into chars
//! (`U+0000..U+00FF`) so the result stays a valid string for storage.

/// Encrypts plaintext with a repeating key.
///
/// An empty key returns the text unchanged.
pub fn encrypt(plain: &str, key: &str) -> String {
    if key.is_empty() {
        return plain.to_string();
    }
    plain
        .bytes()
        .zip(key.bytes().cycle())
        .map(|(byte, key_byte)| char::from(byte ^ key_byte))
        .collect()
}

/// Decrypts ciphertext produced by [`encrypt`] with the same key.
///
/// An empty key returns the text unchanged. Decrypting with the wrong key
/// produces garbage; byte sequences that are not valid UTF-8 come back with
/// replacement characters.
pub fn decrypt(ciphertext: &str, key: &str) -> String {
    if key.is_empty() {
        return ciphertext.to_string();
    }
    let bytes: Vec<u8> = ciphertext
        .chars()
        .zip(key.bytes().cycle())
        .map(|(c, key_byte)| (c as u32 as u8) ^ key_byte)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}
