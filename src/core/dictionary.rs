use std::collections::HashMap;

/// RFC 4648 standard base64 alphabet.
pub const BASE64_STANDARD: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Character set used to turn dictionary bytes into embeddable text.
///
/// Encoding is chunked bit-packing (RFC 4648 style), so the number of
/// characters must be a power of two. The padding character, when present,
/// fills the final group of the encoded output.
#[derive(Debug, Clone)]
pub struct Dictionary {
    chars: Vec<char>,
    char_to_index: HashMap<char, usize>,
    padding: Option<char>,
}

impl Dictionary {
    /// Creates a dictionary from its characters and optional padding. Only
    /// base64 is used for artifacts; other alphabets exercise the codec.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The character list is empty or contains duplicates
    /// - The size is not a power of two
    /// - The padding character is also one of the digits
    #[cfg(test)]
    pub(crate) fn new(chars: Vec<char>, padding: Option<char>) -> Result<Self, String> {
        if chars.is_empty() {
            return Err("Dictionary cannot be empty".to_string());
        }

        let base = chars.len();
        if base < 2 || !base.is_power_of_two() {
            return Err(format!(
                "Chunked encoding requires a power-of-two dictionary size, got {}",
                base
            ));
        }

        let mut char_to_index = HashMap::with_capacity(base);
        for (i, &c) in chars.iter().enumerate() {
            if char_to_index.insert(c, i).is_some() {
                return Err(format!("Duplicate character in dictionary: {}", c));
            }
        }

        if let Some(pad) = padding
            && char_to_index.contains_key(&pad)
        {
            return Err(format!("Padding character '{}' is also a digit", pad));
        }

        Ok(Dictionary {
            chars,
            char_to_index,
            padding,
        })
    }

    /// Creates a dictionary from a string of characters.
    #[cfg(test)]
    pub(crate) fn from_str(s: &str, padding: Option<char>) -> Result<Self, String> {
        Self::new(s.chars().collect(), padding)
    }

    /// The standard padded base64 dictionary every artifact uses.
    pub fn base64() -> Self {
        let chars: Vec<char> = BASE64_STANDARD.chars().collect();
        let char_to_index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Dictionary {
            chars,
            char_to_index,
            padding: Some('='),
        }
    }

    /// Returns the base (radix) of the dictionary.
    pub fn base(&self) -> usize {
        self.chars.len()
    }

    /// Number of input bits carried by one output character.
    pub fn bits_per_char(&self) -> usize {
        self.base().trailing_zeros() as usize
    }

    /// Returns the padding character, if any.
    pub fn padding(&self) -> Option<char> {
        self.padding
    }

    /// Encodes a digit (0 to base-1) as a character.
    ///
    /// Returns `None` if the digit is out of range.
    pub fn encode_digit(&self, digit: usize) -> Option<char> {
        self.chars.get(digit).copied()
    }

    /// Decodes a character back to its digit value.
    ///
    /// Returns `None` if the character is not in the dictionary.
    pub fn decode_char(&self, c: char) -> Option<usize> {
        self.char_to_index.get(&c).copied()
    }

    /// All digit characters in order, for diagnostics.
    pub fn digits(&self) -> String {
        self.chars.iter().collect()
    }
}
