//! 随机点名
//!
//! 从名单里均匀随机抽一个名字，无状态

use rand::Rng;

use super::StateError;

/// 随机抽一个名字
pub fn pick_random_name<'a, R: Rng>(
    names: &'a [String],
    rng: &mut R,
) -> Result<&'a str, StateError> {
    if names.is_empty() {
        return Err(StateError::NoValidNames);
    }
    let index = rng.gen_range(0..names.len());
    Ok(names[index].as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_pick_from_empty_is_error() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pick_random_name(&[], &mut rng), Err(StateError::NoValidNames));
    }

    #[test]
    fn test_pick_single_name() {
        let mut rng = StdRng::seed_from_u64(1);
        let names = vec!["Alice".to_string()];
        assert_eq!(pick_random_name(&names, &mut rng).unwrap(), "Alice");
    }

    #[test]
    fn test_pick_is_from_list() {
        let mut rng = StdRng::seed_from_u64(42);
        let names: Vec<String> = (0..5).map(|i| format!("N{}", i)).collect();
        for _ in 0..100 {
            let picked = pick_random_name(&names, &mut rng).unwrap();
            assert!(names.iter().any(|n| n == picked));
        }
    }
}
