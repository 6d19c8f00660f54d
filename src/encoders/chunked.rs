use crate::core::dictionary::Dictionary;
use num_integer::lcm;

pub use super::errors::DecodeError;

pub fn encode_chunked(data: &[u8], dictionary: &Dictionary) -> String {
    let bits_per_char = dictionary.bits_per_char();

    if bits_per_char == 0 {
        return String::new();
    }

    // Padded output length is known up front
    let output_chars = (data.len() * 8).div_ceil(bits_per_char);
    let group_size = lcm(bits_per_char, 8) / bits_per_char;
    let capacity = if dictionary.padding().is_some() {
        output_chars.div_ceil(group_size) * group_size
    } else {
        output_chars
    };
    let mut result = String::with_capacity(capacity);

    let mask = (1u32 << bits_per_char) - 1;
    let mut bit_buffer = 0u32;
    let mut bits_in_buffer = 0usize;

    // Process in chunks for better CPU cache utilization
    const PROCESS_CHUNK: usize = 64;
    let chunks = data.chunks_exact(PROCESS_CHUNK);
    let remainder = chunks.remainder();

    for chunk in chunks {
        for &byte in chunk {
            bit_buffer = (bit_buffer << 8) | (byte as u32);
            bits_in_buffer += 8;

            while bits_in_buffer >= bits_per_char {
                bits_in_buffer -= bits_per_char;
                let index = ((bit_buffer >> bits_in_buffer) & mask) as usize;
                push_digit(&mut result, dictionary, index);
            }
        }
    }

    for &byte in remainder {
        bit_buffer = (bit_buffer << 8) | (byte as u32);
        bits_in_buffer += 8;

        while bits_in_buffer >= bits_per_char {
            bits_in_buffer -= bits_per_char;
            let index = ((bit_buffer >> bits_in_buffer) & mask) as usize;
            push_digit(&mut result, dictionary, index);
        }
    }

    // Handle remaining bits
    if bits_in_buffer > 0 {
        let index = ((bit_buffer << (bits_per_char - bits_in_buffer)) & mask) as usize;
        push_digit(&mut result, dictionary, index);
    }

    // Pad to a whole group: LCM(bits_per_char, 8) / bits_per_char characters.
    // Base64: LCM(6,8)=24, group=4
    if let Some(pad_char) = dictionary.padding() {
        while result.len() < capacity {
            result.push(pad_char);
        }
    }

    result
}

// Indices are masked to bits_per_char bits, so they are always < base.
#[inline]
fn push_digit(result: &mut String, dictionary: &Dictionary, index: usize) {
    if let Some(c) = dictionary.encode_digit(index) {
        result.push(c);
    }
}

pub fn decode_chunked(encoded: &str, dictionary: &Dictionary) -> Result<Vec<u8>, DecodeError> {
    let bits_per_char = dictionary.bits_per_char();
    let padding = dictionary.padding();

    // Empty data encodes to an empty string, so the reverse must hold too
    if encoded.is_empty() {
        return Ok(Vec::new());
    }

    let estimated_output = (encoded.len() * bits_per_char) / 8;
    let mut result = Vec::with_capacity(estimated_output);

    let mut bit_buffer = 0u32;
    let mut bits_in_buffer = 0usize;

    for (position, c) in encoded.chars().enumerate() {
        if Some(c) == padding {
            validate_padding(encoded, position, dictionary)?;
            break;
        }

        let digit = dictionary.decode_char(c).ok_or_else(|| {
            DecodeError::invalid_character(c, position, encoded, &dictionary.digits())
        })?;

        bit_buffer = (bit_buffer << bits_per_char) | (digit as u32);
        bits_in_buffer += bits_per_char;

        while bits_in_buffer >= 8 {
            bits_in_buffer -= 8;
            let byte = ((bit_buffer >> bits_in_buffer) & 0xFF) as u8;
            result.push(byte);
        }
    }

    Ok(result)
}

/// Everything after the first padding character must also be padding, and
/// the padded text must fill whole groups.
fn validate_padding(
    encoded: &str,
    first_pad: usize,
    dictionary: &Dictionary,
) -> Result<(), DecodeError> {
    let Some(pad) = dictionary.padding() else {
        return Ok(());
    };

    if encoded.chars().skip(first_pad).any(|c| c != pad) {
        return Err(DecodeError::InvalidPadding);
    }

    let bits_per_char = dictionary.bits_per_char();
    let group_size = lcm(bits_per_char, 8) / bits_per_char;
    let total = encoded.chars().count();
    if total % group_size != 0 {
        return Err(DecodeError::invalid_length(
            total,
            format!("multiple of {}", group_size),
            "add padding (=) or check for missing characters",
        ));
    }

    Ok(())
}
