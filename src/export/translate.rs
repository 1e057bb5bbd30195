//! Per-community metadata summaries.
//!
//! Joins a community file against a pipe-delimited dictionary
//! (`id|field|field|...`) and writes one `<index>_<size>.txt` per community:
//! the dictionary line of every known member, then the most frequent tags.

use crate::core::ids::ExternalId;
use anyhow::Context;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Field value meaning "no tag".
const NO_TAG: &str = "-";

pub struct TranslateConfig {
    /// Tags must appear more often than this to be listed.
    pub min_tag_count: usize,
    pub max_tags: usize,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            min_tag_count: 10,
            max_tags: 100,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct TranslateStats {
    pub files: usize,
    pub missing_members: usize,
}

pub fn read_dictionary<R: Read>(reader: R) -> anyhow::Result<HashMap<ExternalId, String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut dictionary = HashMap::new();
    let mut skipped = 0;
    for maybe_record in csv_reader.records() {
        let record = maybe_record.context("cannot read dictionary line")?;
        match record.get(0).map(|id| id.trim().parse::<ExternalId>()) {
            Some(Ok(id)) => {
                let fields = record.iter().skip(1).collect::<Vec<_>>();
                dictionary.insert(id, fields.join("|"));
            }
            _ => skipped += 1,
        }
    }
    debug!(entries = dictionary.len(), skipped, "dictionary loaded");

    Ok(dictionary)
}

/// Tags counted over `members`, most frequent first, ties by name.
pub fn tally_tags(
    members: &[ExternalId],
    dictionary: &HashMap<ExternalId, String>,
    cfg: &TranslateConfig,
) -> Vec<(String, usize)> {
    let mut tags: HashMap<&str, usize> = HashMap::new();
    for entry in members.iter().filter_map(|m| dictionary.get(m)) {
        for tag in entry.split('|') {
            if tag != NO_TAG && !tag.is_empty() {
                *tags.entry(tag).or_insert(0) += 1;
            }
        }
    }

    let mut tags = tags
        .into_iter()
        .filter(|(_, count)| *count > cfg.min_tag_count)
        .map(|(tag, count)| (tag.to_string(), count))
        .collect::<Vec<_>>();
    tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    tags.truncate(cfg.max_tags);
    tags
}

pub fn translate(
    communities: &[(usize, Vec<ExternalId>)],
    dictionary: &HashMap<ExternalId, String>,
    output_dir: &Path,
    cfg: &TranslateConfig,
) -> anyhow::Result<TranslateStats> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create {}", output_dir.display()))?;

    let mut stats = TranslateStats::default();
    for (index, members) in communities {
        let path = output_dir.join(format!("{index}_{}.txt", members.len()));
        let file = File::create(&path).with_context(|| format!("cannot create {}", path.display()))?;
        let mut out = BufWriter::new(file);

        for member in members {
            match dictionary.get(member) {
                Some(entry) => writeln!(out, "{entry}")?,
                None => {
                    warn!(community = index, member, "member missing from dictionary");
                    stats.missing_members += 1;
                }
            }
        }
        for (tag, count) in tally_tags(members, dictionary, cfg) {
            writeln!(out, "tag|{tag}|{count}")?;
        }
        out.flush()
            .with_context(|| format!("cannot write {}", path.display()))?;
        stats.files += 1;
    }

    info!(
        files = stats.files,
        missing = stats.missing_members,
        output = %output_dir.display(),
        "community summaries written"
    );

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn dictionary() -> HashMap<ExternalId, String> {
        read_dictionary(Cursor::new("1|rock|pop\n2|rock|-\n3|jazz|rock\nname|x|y\n")).unwrap()
    }

    #[test]
    fn test_read_dictionary() {
        let d = dictionary();
        assert_eq!(3, d.len());
        assert_eq!(Some(&"rock|pop".to_string()), d.get(&1));
        assert_eq!(Some(&"rock|-".to_string()), d.get(&2));
    }

    #[test]
    fn test_tally_tags_threshold_and_order() {
        let d = dictionary();
        let cfg = TranslateConfig {
            min_tag_count: 0,
            max_tags: 100,
        };

        let tags = tally_tags(&[1, 2, 3, 9], &d, &cfg);
        assert_eq!(
            vec![
                ("rock".to_string(), 3),
                ("jazz".to_string(), 1),
                ("pop".to_string(), 1)
            ],
            tags
        );

        let strict = TranslateConfig {
            min_tag_count: 2,
            max_tags: 100,
        };
        assert_eq!(vec![("rock".to_string(), 3)], tally_tags(&[1, 2, 3], &d, &strict));
    }

    #[test]
    fn test_tally_tags_cap() {
        let d = dictionary();
        let cfg = TranslateConfig {
            min_tag_count: 0,
            max_tags: 2,
        };
        assert_eq!(2, tally_tags(&[1, 2, 3], &d, &cfg).len());
    }

    #[test]
    fn test_default_thresholds() {
        let d = dictionary();
        // nothing reaches eleven occurrences here
        assert!(tally_tags(&[1, 2, 3], &d, &TranslateConfig::default()).is_empty());
    }

    #[test]
    fn test_translate_writes_summaries() {
        let dir = std::env::temp_dir().join(format!("demon-translate-{}", std::process::id()));
        let d = dictionary();
        let cfg = TranslateConfig {
            min_tag_count: 1,
            max_tags: 100,
        };
        let communities = vec![(0, vec![1, 2, 3]), (1, vec![2, 42])];

        let stats = translate(&communities, &d, &dir, &cfg).unwrap();
        assert_eq!(TranslateStats { files: 2, missing_members: 1 }, stats);

        let first = fs::read_to_string(dir.join("0_3.txt")).unwrap();
        assert_eq!("rock|pop\nrock|-\njazz|rock\ntag|rock|3\n", first);
        let second = fs::read_to_string(dir.join("1_2.txt")).unwrap();
        assert_eq!("rock|-\n", second);

        fs::remove_dir_all(&dir).unwrap();
    }
}
