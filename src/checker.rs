//! Consistency checker for the macro subtree.
//!
//! A diagnostic pass over the assembled tree: it flattens the recursive
//! folder structure, reports duplicate identifiers, and summarizes identifier
//! usage as compressed ranges ("3-5 9"). Findings are logged through
//! `tracing` and returned in a [`ConsistencyReport`]; they are never raised
//! as errors, mirroring the target application's own duplicate-ID warnings.
//!
//! The aggregate root runs this pass as a side effect of encoding, but it is
//! separately callable for a caller who only wants the diagnostics.

use crate::ccm::{ControlChangeMacroList, MacroItem};

/// The kinds of identifier the checker tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Folder,
    Macro,
    Table,
}

impl IdKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "Folder",
            Self::Macro => "CCM",
            Self::Table => "Table",
        }
    }
}

impl std::fmt::Display for IdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One duplicated identifier, reported once per repeated adjacency.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateId {
    pub kind: IdKind,
    pub id: i64,
}

/// Compressed identifier usage for one kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdUsage {
    pub kind: IdKind,
    /// Closed ranges, ascending; a single id is a range of length one.
    pub ranges: Vec<(i64, i64)>,
}

impl IdUsage {
    /// Render the ranges the way the reports print them: bare numbers for
    /// length-1 ranges, `start-end` otherwise, space separated.
    pub fn format_ranges(&self) -> String {
        let mut out = String::new();
        for (start, end) in &self.ranges {
            if !out.is_empty() {
                out.push(' ');
            }
            if start == end {
                out.push_str(&start.to_string());
            } else {
                out.push_str(&format!("{start}-{end}"));
            }
        }
        out
    }
}

/// Findings of one checker run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConsistencyReport {
    pub duplicates: Vec<DuplicateId>,
    pub usage: Vec<IdUsage>,
}

impl ConsistencyReport {
    /// Log every finding: duplicates at error level, usage at info level.
    pub fn log(&self) {
        for dup in &self.duplicates {
            tracing::error!("duplicate {} ID: {}", dup.kind, dup.id);
        }
        for usage in &self.usage {
            tracing::info!("{} IDs in use: {}", usage.kind, usage.format_ranges());
        }
    }
}

/// Run the consistency pass over an assembled macro list.
pub fn check(list: &ControlChangeMacroList) -> ConsistencyReport {
    let mut folders: Vec<Option<i64>> = Vec::new();
    let mut macros: Vec<Option<i64>> = Vec::new();
    let mut tables: Vec<Option<i64>> = Vec::new();
    flatten(&list.items, &mut folders, &mut macros, &mut tables);

    let mut report = ConsistencyReport::default();
    for (kind, ids) in [
        (IdKind::Folder, folders),
        (IdKind::Macro, macros),
        (IdKind::Table, tables),
    ] {
        scan(kind, ids, &mut report);
    }
    report
}

/// Collect folder, macro, and table ids in decode order. Links and memos
/// carry no identity of their own and are excluded.
fn flatten(
    items: &[MacroItem],
    folders: &mut Vec<Option<i64>>,
    macros: &mut Vec<Option<i64>>,
    tables: &mut Vec<Option<i64>>,
) {
    for item in items {
        match item {
            MacroItem::Folder(folder) => {
                folders.push(folder.id);
                flatten(&folder.items, folders, macros, tables);
            }
            MacroItem::Ccm(ccm) => macros.push(Some(ccm.id)),
            MacroItem::Table(table) => tables.push(Some(table.id)),
            MacroItem::FolderLink(_) | MacroItem::CcmLink(_) | MacroItem::Memo(_) => {}
        }
    }
}

fn scan(kind: IdKind, mut ids: Vec<Option<i64>>, report: &mut ConsistencyReport) {
    // Ascending by id; id-less entries sort last, stable among themselves,
    // and are never compared for duplication.
    ids.sort_by(|a, b| match (a, b) {
        (Some(x), Some(y)) => x.cmp(y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let mut prev: Option<i64> = None;
    let mut ranges: Vec<(i64, i64)> = Vec::new();
    for id in ids.into_iter().flatten() {
        if prev == Some(id) {
            report.duplicates.push(DuplicateId { kind, id });
        }
        match ranges.last_mut() {
            // An equal or consecutive id extends the open range.
            Some((_, end)) if id <= *end + 1 => *end = id.max(*end),
            _ => ranges.push((id, id)),
        }
        prev = Some(id);
    }

    if !ranges.is_empty() {
        report.usage.push(IdUsage { kind, ranges });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ccm::{Ccm, CcmFolder, CcmLink, Table};

    fn list_of_macros(ids: &[i64]) -> ControlChangeMacroList {
        ControlChangeMacroList {
            items: ids
                .iter()
                .map(|&id| MacroItem::Ccm(Ccm::new(id, format!("cc{id}"))))
                .collect(),
        }
    }

    #[test]
    fn reports_one_duplicate_and_compressed_ranges() {
        let report = check(&list_of_macros(&[1, 1, 3, 4, 5, 9]));

        assert_eq!(
            report.duplicates,
            vec![DuplicateId {
                kind: IdKind::Macro,
                id: 1
            }]
        );
        assert_eq!(report.usage.len(), 1);
        assert_eq!(report.usage[0].format_ranges(), "1 3-5 9");
    }

    #[test]
    fn id_repeated_three_times_reports_two_duplicates() {
        let report = check(&list_of_macros(&[7, 7, 7]));
        assert_eq!(report.duplicates.len(), 2);
        assert_eq!(report.usage[0].format_ranges(), "7");
    }

    #[test]
    fn flattening_descends_folders_and_skips_links() {
        let mut inner = CcmFolder::new("Inner");
        inner.id = Some(3);
        inner.items.push(MacroItem::Ccm(Ccm::new(20, "inner cc")));
        inner.items.push(MacroItem::CcmLink(CcmLink {
            id: 20,
            value: None,
            gate: None,
        }));

        let mut outer = CcmFolder::new("Outer");
        outer.id = Some(3);
        outer.items.push(MacroItem::Folder(inner));
        outer.items.push(MacroItem::Memo("notes".to_string()));

        let list = ControlChangeMacroList {
            items: vec![
                MacroItem::Folder(outer),
                MacroItem::Ccm(Ccm::new(21, "outer cc")),
                MacroItem::Table(Table {
                    id: 0,
                    entries: Vec::new(),
                }),
            ],
        };

        let report = check(&list);
        // Both folders carry id 3; the link to CCM 20 must not count.
        assert_eq!(
            report.duplicates,
            vec![DuplicateId {
                kind: IdKind::Folder,
                id: 3
            }]
        );
        let macro_usage = report
            .usage
            .iter()
            .find(|u| u.kind == IdKind::Macro)
            .expect("macro usage");
        assert_eq!(macro_usage.format_ranges(), "20-21");
        let table_usage = report
            .usage
            .iter()
            .find(|u| u.kind == IdKind::Table)
            .expect("table usage");
        assert_eq!(table_usage.format_ranges(), "0");
    }

    #[test]
    fn id_less_folders_are_never_duplicates() {
        let list = ControlChangeMacroList {
            items: vec![
                MacroItem::Folder(CcmFolder::new("a")),
                MacroItem::Folder(CcmFolder::new("b")),
            ],
        };
        let report = check(&list);
        assert!(report.duplicates.is_empty());
        assert!(report.usage.is_empty());
    }

    #[test]
    fn empty_list_reports_nothing() {
        let report = check(&ControlChangeMacroList::default());
        assert_eq!(report, ConsistencyReport::default());
    }
}
