use crate::analysis::merge::CommunitySet;
use crate::core::ids::{ExternalId, NodeRegistry};
use anyhow::{Context, bail};
use std::io::{Read, Write};

/// Formats members the way the result file lists them: `[1, 2, 3]`.
pub fn format_members(members: &[ExternalId]) -> String {
    let parts = members.iter().map(|m| m.to_string()).collect::<Vec<_>>();
    format!("[{}]", parts.join(", "))
}

pub fn parse_members(field: &str) -> anyhow::Result<Vec<ExternalId>> {
    let inner = field
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .with_context(|| format!("member list {field:?} is not bracketed"))?;
    if inner.trim().is_empty() {
        return Ok(vec![]);
    }
    inner
        .split(',')
        .map(|m| {
            m.trim()
                .parse::<ExternalId>()
                .with_context(|| format!("invalid member {m:?}"))
        })
        .collect()
}

/// Writes `<index>\t[members]` per community, members as external ids in
/// ascending order. Returns the number of lines written.
///
/// # Panics
/// If a community holds an id the registry never issued.
pub fn write_communities<W: Write>(
    writer: W,
    communities: &CommunitySet,
    registry: &NodeRegistry,
) -> anyhow::Result<usize> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    let mut written = 0;
    for (index, community) in communities.iter().enumerate() {
        let mut members = community
            .members()
            .iter()
            .map(|id| match registry.external(*id) {
                Some(external) => external,
                None => panic!("community member {id} is not a registered node"),
            })
            .collect::<Vec<_>>();
        members.sort_unstable();

        csv_writer
            .write_record([index.to_string(), format_members(&members)])
            .context("cannot write community")?;
        written += 1;
    }
    csv_writer.flush().context("cannot flush communities")?;

    Ok(written)
}

pub fn read_communities<R: Read>(reader: R) -> anyhow::Result<Vec<(usize, Vec<ExternalId>)>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(reader);

    let mut communities = vec![];
    for maybe_record in csv_reader.records() {
        let record = maybe_record.context("cannot read community line")?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 2 {
            bail!("line {line}: expected `<index>\\t[members]`");
        }
        let index = record[0]
            .parse::<usize>()
            .with_context(|| format!("line {line}: invalid community index"))?;
        let members = parse_members(&record[1]).with_context(|| format!("line {line}"))?;
        communities.push((index, members));
    }

    Ok(communities)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::merge::Community;
    use std::io::Cursor;

    #[test]
    fn test_format_members() {
        assert_eq!("[1, 2, 30]", format_members(&[1, 2, 30]));
        assert_eq!("[-4]", format_members(&[-4]));
        assert_eq!("[]", format_members(&[]));
    }

    #[test]
    fn test_parse_members() {
        assert_eq!(vec![1, 2, 30], parse_members("[1, 2, 30]").unwrap());
        assert_eq!(vec![7], parse_members("[7]").unwrap());
        assert!(parse_members("[]").unwrap().is_empty());
        assert!(parse_members("1, 2").is_err());
        assert!(parse_members("[1, x]").is_err());
    }

    #[test]
    fn test_external_ids_sorted() {
        let mut registry = NodeRegistry::new();
        for external in [50, 10, 30, 20] {
            registry.get_or_insert(external);
        }
        let mut set = CommunitySet::new(0.25);
        set.offer(Community::from_members(vec![0, 1, 2]));
        set.offer(Community::from_members(vec![3, 1]));

        let mut out = Vec::new();
        assert_eq!(1, write_communities(&mut out, &set, &registry).unwrap());
        assert_eq!("0\t[10, 20, 30, 50]\n", String::from_utf8(out).unwrap());
    }

    #[test]
    fn test_lines_per_community() {
        let mut registry = NodeRegistry::new();
        for external in 1..=6 {
            registry.get_or_insert(external);
        }
        let mut set = CommunitySet::new(0.5);
        set.offer(Community::from_members(vec![0, 1, 2]));
        set.offer(Community::from_members(vec![3, 4, 5]));

        let mut out = Vec::new();
        write_communities(&mut out, &set, &registry).unwrap();
        assert_eq!("0\t[1, 2, 3]\n1\t[4, 5, 6]\n", String::from_utf8(out.clone()).unwrap());

        let read = read_communities(Cursor::new(out)).unwrap();
        assert_eq!(vec![(0, vec![1, 2, 3]), (1, vec![4, 5, 6])], read);
    }

    #[test]
    #[should_panic]
    fn test_unregistered_member() {
        let registry = NodeRegistry::new();
        let mut set = CommunitySet::new(0.25);
        set.offer(Community::from_members(vec![0, 1]));

        let _ = write_communities(Vec::new(), &set, &registry);
    }

    #[test]
    fn test_malformed_community_file() {
        assert!(read_communities(Cursor::new("0\n")).is_err());
        assert!(read_communities(Cursor::new("x\t[1, 2]\n")).is_err());
        assert!(read_communities(Cursor::new("0\t1, 2\n")).is_err());
    }
}
