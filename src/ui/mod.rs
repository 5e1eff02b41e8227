//! Terminal screens. Only the binary uses these.

pub mod practice_scene;

use std::time::{SystemTime, UNIX_EPOCH};

/// Braille spinner characters for animated waiting indicators.
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Current spinner character; cycles every 100ms.
pub fn spinner_char() -> char {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    SPINNER[((millis / 100) % SPINNER.len() as u128) as usize]
}
