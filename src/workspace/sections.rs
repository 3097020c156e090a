use super::WorkspaceError;
use crate::shared::ids::SectionName;
use std::path::{Component, Path, PathBuf};

pub const INPUT_SECTION: &str = "input";
pub const OUTPUT_SECTION: &str = "output";
pub const RESOURCES_SECTION: &str = "resources";
pub const SCRATCH_SECTION: &str = "scratch";

/// Sections every workspace gets, in creation order.
pub const DEFAULT_SECTIONS: [&str; 4] = [
    INPUT_SECTION,
    OUTPUT_SECTION,
    RESOURCES_SECTION,
    SCRATCH_SECTION,
];

/// Maps `name` to its directory under `root`. Pure: never touches the
/// filesystem, so an unknown section fails before any I/O happens.
pub fn resolve(
    sections: &[SectionName],
    root: &Path,
    name: &str,
) -> Result<PathBuf, WorkspaceError> {
    if sections.iter().any(|section| section.as_str() == name) {
        return Ok(root.join(name));
    }
    Err(WorkspaceError::UnknownSection {
        name: name.to_string(),
        valid: sections.iter().map(|s| s.as_str().to_string()).collect(),
    })
}

/// Builds the ordered section set: defaults first, then `extras` in order.
/// Repeats are dropped, keeping the first occurrence.
pub fn build_section_set<I, S>(extras: I) -> Result<Vec<SectionName>, WorkspaceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sections = Vec::with_capacity(DEFAULT_SECTIONS.len());
    for name in DEFAULT_SECTIONS {
        push_unique(&mut sections, name)?;
    }
    for name in extras {
        push_unique(&mut sections, name.as_ref())?;
    }
    Ok(sections)
}

fn push_unique(sections: &mut Vec<SectionName>, raw: &str) -> Result<(), WorkspaceError> {
    let name = SectionName::parse(raw).map_err(|reason| WorkspaceError::InvalidSectionName {
        name: raw.to_string(),
        reason,
    })?;
    if !sections.contains(&name) {
        sections.push(name);
    }
    Ok(())
}

/// Joins `relative` onto a section directory, refusing anything that could
/// land outside it.
pub(crate) fn join_within(
    section_dir: &Path,
    section: &str,
    relative: &str,
) -> Result<PathBuf, WorkspaceError> {
    let invalid = |reason: &str| WorkspaceError::InvalidRelativePath {
        section: section.to_string(),
        path: relative.to_string(),
        reason: reason.to_string(),
    };
    let candidate = Path::new(relative);
    if relative.is_empty() {
        return Err(invalid("path must be non-empty"));
    }
    for component in candidate.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => return Err(invalid("path must not contain `..`")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("path must be relative"))
            }
        }
    }
    Ok(section_dir.join(candidate))
}
