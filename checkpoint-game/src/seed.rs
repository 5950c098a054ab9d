//! Reversible run-code scheme with a 64-word list.
//! Code format: `CP-<WORD><NN>`, e.g., CP-LANTERN42, CP-STATIC07

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    let mut hash = FNV_OFFSET;
    for b in bytes {
        hash = (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME);
    }
    hash
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

// Word list for run codes
pub const WORD_LIST: [&str; 64] = [
    "LANTERN", "STATIC", "BOOTH", "GATE", "STAMP", "VISA", "BADGE", "SCANNER", "HALLWAY", "SIREN",
    "LOCKER", "PERMIT", "QUOTA", "SHIFT", "LEDGER", "RADIO", "FLICKER", "VOID", "MIRROR", "ECHO",
    "HOLLOW", "WARDEN", "BUNKER", "CONCRETE", "FENCE", "TOWER", "SEARCH", "DOSSIER", "CIPHER",
    "SIGNAL", "TAPE", "RECORD", "WITNESS", "SLEEPER", "VESSEL", "MASK", "TEETH", "FINGERS",
    "EYES", "LIMBS", "STRANGER", "VISITOR", "CURFEW", "ALARM", "BLACKOUT", "COFFEE", "PILLOW",
    "VEST", "BATTERY", "SEDATIVE", "LENS", "HIGHWAY", "EXIT", "DOOR", "SWITCH", "CORRIDOR",
    "NIGHT", "DAWN", "FOG", "RUST", "ASH", "SALT", "IRON", "GLASS",
];

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index & 0x01FF | ((u16::from(nn) & 0x7F) << 9)
}

#[inline]
fn unpack(packed: u16) -> (u16, u8) {
    (packed & 0x01FF, ((packed >> 9) & 0x7F) as u8)
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    // Domain-separated FNV input
    let mut buf = [0u8; 9];
    buf[..6].copy_from_slice(b"CHKPT-");
    buf[6] = (packed & 0xFF) as u8;
    buf[7] = (packed >> 8) as u8;
    buf[8] = 0x5A;
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

/// Render a seed as a friendly run code.
#[must_use]
pub fn encode_friendly(seed: u64) -> String {
    let packed = (seed & 0xFFFF) as u16;
    let (wi, mut nn) = unpack(packed);
    let word = WORD_LIST.get(wi as usize).copied().unwrap_or("LANTERN");
    if nn > 99 {
        nn %= 100;
    }
    format!("CP-{word}{nn:02}")
}

/// Parse a run code back into its canonical seed.
#[must_use]
pub fn decode_to_seed(code: &str) -> Option<u64> {
    let s = code.trim();
    let (prefix, rest) = s.split_once('-')?;
    if !prefix.eq_ignore_ascii_case("CP") || !rest.is_ascii() || rest.len() < 3 {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    if !nn_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

/// Build a fresh run code from arbitrary entropy (clock, `Math.random`, ...).
#[must_use]
pub fn generate_code_from_entropy(entropy: u64) -> String {
    let wi = u16::try_from(entropy % WORD_LIST.len() as u64).unwrap_or(0);
    let nn = ((entropy >> 17) % 100) as u8;
    encode_friendly(compose_seed(wi, nn))
}
