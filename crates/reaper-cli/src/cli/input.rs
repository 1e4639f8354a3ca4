use super::config::CliConfig;
use anyhow::Context;
use reaper::{IdSet, ObjectId};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Builds the set of IDs to delete from the arguments and, with `--stdin`,
/// from standard input.
///
/// Duplicates collapse. Any malformed ID fails the whole command before a
/// single removal is issued.
pub async fn collect_ids(config: &CliConfig) -> anyhow::Result<IdSet> {
    let mut ids = parse_ids(&config.ids)?;
    if config.stdin {
        let stdin = BufReader::new(tokio::io::stdin());
        ids.extend(read_ids(stdin).await?);
    }
    Ok(ids)
}

pub fn parse_ids<I, S>(raw: I) -> anyhow::Result<IdSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut ids = IdSet::new();
    for raw in raw {
        let raw = raw.as_ref().trim();
        let id = raw
            .parse::<ObjectId>()
            .with_context(|| format!("invalid ID `{raw}`"))?;
        ids.insert(id);
    }
    Ok(ids)
}

/// Reads one ID per line, skipping blank lines.
pub async fn read_ids<R>(reader: R) -> anyhow::Result<IdSet>
where
    R: AsyncBufRead + Unpin,
{
    let mut ids = IdSet::new();
    let mut lines = reader.lines();
    let mut line_no = 0_usize;

    while let Some(line) = lines.next_line().await.context("failed to read IDs")? {
        line_no += 1;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        let id = raw
            .parse::<ObjectId>()
            .with_context(|| format!("invalid ID `{raw}` on line {line_no}"))?;
        ids.insert(id);
    }

    Ok(ids)
}
