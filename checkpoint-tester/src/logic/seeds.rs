use anyhow::{Context, Result, bail};
use checkpoint_game::decode_to_seed;
use checkpoint_game::seed::WORD_LIST;
use std::collections::HashMap;

pub const DEFAULT_SEED: u64 = 1337;

/// A seed to simulate, with the run code it was typed as (if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    pub code: Option<String>,
}

impl SeedInfo {
    #[must_use]
    pub const fn from_numeric(seed: u64) -> Self {
        Self { seed, code: None }
    }

    #[must_use]
    pub const fn from_run_code(seed: u64, code: String) -> Self {
        Self {
            seed,
            code: Some(code),
        }
    }

    #[must_use]
    pub fn label(&self) -> String {
        self.code
            .clone()
            .unwrap_or_else(|| checkpoint_game::encode_friendly(self.seed))
    }
}

/// Resolve CLI seed arguments into deduplicated seeds.
///
/// Accepts integers, run codes such as `CP-LANTERN42`, and `all`, which
/// expands to every run code.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut pending: Vec<SeedInfo> = Vec::new();
    let mut request_all = false;

    for token in tokens {
        if token.is_empty() {
            continue;
        }
        if token.eq_ignore_ascii_case("all") {
            request_all = true;
            continue;
        }
        if let Ok(value) = token.parse::<i64>() {
            pending.push(SeedInfo::from_numeric(value.unsigned_abs()));
            continue;
        }
        if let Ok(value) = token.parse::<u64>() {
            pending.push(SeedInfo::from_numeric(value));
            continue;
        }
        if let Some(seed) = decode_to_seed(token) {
            pending.push(SeedInfo::from_run_code(seed, token.trim().to_uppercase()));
            continue;
        }
        bail!("Unrecognized seed token: {token}");
    }

    if request_all {
        pending.extend(all_run_code_seeds()?);
    }

    let mut deduped: Vec<SeedInfo> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();
    for info in pending {
        match index.get(&info.seed).and_then(|&i| deduped.get_mut(i)) {
            Some(entry) => {
                if entry.code.is_none() && info.code.is_some() {
                    *entry = info;
                }
            }
            None => {
                index.insert(info.seed, deduped.len());
                deduped.push(info);
            }
        }
    }

    if deduped.is_empty() {
        deduped.push(SeedInfo::from_numeric(DEFAULT_SEED));
    }
    Ok(deduped)
}

fn all_run_code_seeds() -> Result<Vec<SeedInfo>> {
    let mut seeds = Vec::with_capacity(WORD_LIST.len() * 100);
    for word in WORD_LIST {
        for suffix in 0..100 {
            let code = format!("CP-{word}{suffix:02}");
            let seed = decode_to_seed(&code)
                .with_context(|| format!("failed to parse run code: {code}"))?;
            seeds.push(SeedInfo::from_run_code(seed, code));
        }
    }
    Ok(seeds)
}
