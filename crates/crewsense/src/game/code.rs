//! Lobby code decoding.
//!
//! The game packs its six-letter lobby code into a 32-bit integer: the low
//! 10 bits carry the first two letters, the next 20 bits the last four.
//! The top two bits are not part of the code.

const ALPHABET: &[u8; 26] = b"QWXRTYLPESDFGHUJKZOCVBINMA";

/// Lobby code shown when no lobby is joined
pub const NO_LOBBY: &str = "MENU";

/// Decode a packed game code; 0 decodes to an empty string
pub fn decode_game_code(value: u32) -> String {
    if value == 0 {
        return String::new();
    }

    let a = (value & 0x3FF) as usize;
    let b = ((value >> 10) & 0xF_FFFF) as usize;

    [
        a % 26,
        (a / 26) % 26,
        b % 26,
        (b / 26) % 26,
        (b / 676) % 26,
        (b / 17576) % 26,
    ]
    .iter()
    .map(|&i| ALPHABET[i] as char)
    .collect()
}

/// Decode a packed game code for display, `"MENU"` when there is none
pub fn lobby_code(value: u32) -> String {
    match decode_game_code(value) {
        code if code.is_empty() => NO_LOBBY.to_string(),
        code => code,
    }
}
