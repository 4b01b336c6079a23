use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// `<prefix>_<unix millis>_<9 random base36 chars>`
pub fn timestamped(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    format!("{prefix}_{}_{suffix}", now_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let id = timestamped("recipe");
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "recipe");
        assert!(parts[1].parse::<u64>().is_ok());
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| BASE36.contains(&b)));
    }

    #[test]
    fn test_unique() {
        assert_ne!(timestamped("device"), timestamped("device"));
    }
}
