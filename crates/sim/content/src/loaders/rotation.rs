//! Rotation loader.

use std::path::Path;

use apl::RotationConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for priority lists from RON files.
pub struct RotationLoader;

impl RotationLoader {
    /// Load a rotation from a RON file.
    pub fn load(path: &Path) -> LoadResult<RotationConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RotationConfig> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse rotation RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apl::{ActionConfig, ValueConfig};

    #[test]
    fn parses_entry_ids_and_conditions() {
        let rotation = RotationLoader::parse(
            r#"(
                priority_list: [
                    (
                        uuid: Some("67e55044-10b1-426f-9247-bb680e5fe0c8"),
                        condition: Some(DotLowestRemainingTime(spell_id: 55078)),
                        action: CastSpell(spell_id: 55078),
                    ),
                    (action: Wait(secs: 0.25)),
                ],
            )"#,
        )
        .unwrap();

        let first = &rotation.priority_list[0];
        assert_eq!(
            first.uuid.unwrap().to_string(),
            "67e55044-10b1-426f-9247-bb680e5fe0c8"
        );
        assert!(matches!(
            first.condition,
            Some(ValueConfig::DotLowestRemainingTime { .. })
        ));
        assert_eq!(
            rotation.priority_list[1].action,
            ActionConfig::Wait { secs: 0.25 }
        );
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let err = RotationLoader::parse("(priority_list: [(action: Dance)])").unwrap_err();
        assert!(err.to_string().contains("Failed to parse rotation RON"));
    }
}
