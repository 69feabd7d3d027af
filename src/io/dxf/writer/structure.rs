//! Section, table and block nesting rules
//!
//! ```text
//! Idle -> Section(s) -> Table(t) -> Section(s) -> Idle
//!                    -> Block     -> Section(s)        (BLOCKS only)
//! ```

use crate::error::{DxfError, Result};
use crate::io::dxf::{Section, TableKind};

/// Tracks what is open while a file is written
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StructureState {
    section: Option<Section>,
    table: Option<TableKind>,
    in_block: bool,
}

impl StructureState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(&self) -> Option<Section> {
        self.section
    }

    pub fn table(&self) -> Option<TableKind> {
        self.table
    }

    pub fn in_block(&self) -> bool {
        self.in_block
    }

    pub fn begin_section(&mut self, section: Section) -> Result<()> {
        if let Some(open) = self.section {
            return Err(DxfError::structure(format!(
                "cannot open section {} while {} is open",
                section, open
            )));
        }
        self.section = Some(section);
        Ok(())
    }

    pub fn end_section(&mut self) -> Result<Section> {
        let section = self
            .section
            .ok_or_else(|| DxfError::structure("no section is open"))?;
        if let Some(table) = self.table {
            return Err(DxfError::structure(format!(
                "table {} is still open in {}",
                table, section
            )));
        }
        if self.in_block {
            return Err(DxfError::structure("a block is still open"));
        }
        self.section = None;
        Ok(section)
    }

    pub fn begin_table(&mut self, kind: TableKind) -> Result<()> {
        if self.section != Some(Section::Tables) {
            return Err(DxfError::structure(format!(
                "table {} outside the TABLES section",
                kind
            )));
        }
        if let Some(open) = self.table {
            return Err(DxfError::structure(format!(
                "cannot open table {} while {} is open",
                kind, open
            )));
        }
        self.table = Some(kind);
        Ok(())
    }

    pub fn end_table(&mut self) -> Result<TableKind> {
        self.table
            .take()
            .ok_or_else(|| DxfError::structure("no table is open"))
    }

    pub fn begin_block(&mut self) -> Result<()> {
        if self.section != Some(Section::Blocks) {
            return Err(DxfError::structure("block outside the BLOCKS section"));
        }
        if self.in_block {
            return Err(DxfError::structure("blocks cannot be nested"));
        }
        self.in_block = true;
        Ok(())
    }

    pub fn end_block(&mut self) -> Result<()> {
        if !self.in_block {
            return Err(DxfError::structure("no block is open"));
        }
        self.in_block = false;
        Ok(())
    }

    /// Entities go in ENTITIES, or inside an open block
    pub fn require_entity_context(&self) -> Result<()> {
        match self.section {
            Some(Section::Entities) => Ok(()),
            Some(Section::Blocks) if self.in_block => Ok(()),
            Some(section) => Err(DxfError::structure(format!(
                "entity written in section {} outside a block",
                section
            ))),
            None => Err(DxfError::structure("entity written outside any section")),
        }
    }

    /// Everything must be closed before EOF
    pub fn finish(&self) -> Result<()> {
        match self.section {
            None => Ok(()),
            Some(section) => Err(DxfError::structure(format!(
                "section {} was not closed",
                section
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_structure_error<T: std::fmt::Debug>(result: Result<T>) -> bool {
        matches!(result, Err(DxfError::Structure(_)))
    }

    #[test]
    fn test_legal_sequence() {
        let mut state = StructureState::new();
        state.begin_section(Section::Tables).unwrap();
        state.begin_table(TableKind::Layer).unwrap();
        assert_eq!(state.end_table().unwrap(), TableKind::Layer);
        assert_eq!(state.end_section().unwrap(), Section::Tables);

        state.begin_section(Section::Blocks).unwrap();
        state.begin_block().unwrap();
        state.require_entity_context().unwrap();
        state.end_block().unwrap();
        state.end_section().unwrap();
        state.finish().unwrap();
    }

    #[test]
    fn test_nested_section() {
        let mut state = StructureState::new();
        state.begin_section(Section::Header).unwrap();
        assert!(is_structure_error(state.begin_section(Section::Tables)));
    }

    #[test]
    fn test_end_without_section() {
        let mut state = StructureState::new();
        assert!(is_structure_error(state.end_section()));
        assert!(is_structure_error(state.end_table()));
        assert!(is_structure_error(state.end_block()));
    }

    #[test]
    fn test_table_outside_tables() {
        let mut state = StructureState::new();
        assert!(is_structure_error(state.begin_table(TableKind::AppId)));
        state.begin_section(Section::Entities).unwrap();
        assert!(is_structure_error(state.begin_table(TableKind::AppId)));
    }

    #[test]
    fn test_nested_table_and_unclosed_table() {
        let mut state = StructureState::new();
        state.begin_section(Section::Tables).unwrap();
        state.begin_table(TableKind::VPort).unwrap();
        assert!(is_structure_error(state.begin_table(TableKind::Layer)));
        assert!(is_structure_error(state.end_section()));
    }

    #[test]
    fn test_block_rules() {
        let mut state = StructureState::new();
        state.begin_section(Section::Entities).unwrap();
        assert!(is_structure_error(state.begin_block()));
        state.end_section().unwrap();

        state.begin_section(Section::Blocks).unwrap();
        assert!(is_structure_error(state.require_entity_context()));
        state.begin_block().unwrap();
        assert!(is_structure_error(state.begin_block()));
        assert!(is_structure_error(state.end_section()));
    }

    #[test]
    fn test_entity_context() {
        let mut state = StructureState::new();
        assert!(is_structure_error(state.require_entity_context()));
        state.begin_section(Section::Objects).unwrap();
        assert!(is_structure_error(state.require_entity_context()));
    }

    #[test]
    fn test_finish_with_open_section() {
        let mut state = StructureState::new();
        state.begin_section(Section::Objects).unwrap();
        assert!(is_structure_error(state.finish()));
    }
}
