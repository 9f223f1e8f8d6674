//! Sibling grouping of list items.
//!
//! Consecutive bulleted items share one `<ul>`, consecutive numbered items
//! share one `<ol>`. Each list kind is tracked by its own [`ListGroup`], a
//! two-state machine driven in one left-to-right pass:
//!
//! | state     | list item of this kind   | any other block          |
//! |-----------|--------------------------|--------------------------|
//! | `Outside` | emit open tag → `Inside` | stay                     |
//! | `Inside`  | stay                     | emit close tag → `Outside` |
//!
//! Groups are closed before another is opened, so adjacent items of different
//! list kinds produce sibling containers and never nest. `table_row` blocks
//! are rendered by their table and skipped here without any transition.

use crate::block::{Block, BlockKind};

/// Store kind rendered by the page itself rather than by the compiler.
const TABLE_OF_CONTENTS: &str = "table_of_contents";

/// Grouping state of one list kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupState {
    Outside,
    Inside,
}

/// List container kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListKind {
    Bulleted,
    Numbered,
}

impl ListKind {
    /// List kind of a block kind, if it is a list item.
    #[must_use]
    pub fn of(kind: &BlockKind) -> Option<Self> {
        match kind {
            BlockKind::BulletedListItem => Some(Self::Bulleted),
            BlockKind::NumberedListItem => Some(Self::Numbered),
            _ => None,
        }
    }

    fn open_tag(self) -> &'static str {
        match self {
            Self::Bulleted => "<ul>",
            Self::Numbered => "<ol>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            Self::Bulleted => "</ul>",
            Self::Numbered => "</ol>",
        }
    }
}

/// Two-state machine for one list kind.
#[derive(Clone, Copy, Debug)]
pub struct ListGroup {
    kind: ListKind,
    state: GroupState,
}

impl ListGroup {
    #[must_use]
    pub fn new(kind: ListKind) -> Self {
        Self {
            kind,
            state: GroupState::Outside,
        }
    }

    #[must_use]
    pub fn state(&self) -> GroupState {
        self.state
    }

    /// Feed the next sibling's list kind, emitting any container tag it causes.
    pub fn step(&mut self, next: Option<ListKind>, out: &mut String) {
        match (self.state, next == Some(self.kind)) {
            (GroupState::Outside, true) => {
                out.push_str(self.kind.open_tag());
                self.state = GroupState::Inside;
            }
            (GroupState::Inside, false) => self.close(out),
            _ => {}
        }
    }

    /// Close the container if open.
    pub fn close(&mut self, out: &mut String) {
        if self.state == GroupState::Inside {
            out.push_str(self.kind.close_tag());
            self.state = GroupState::Outside;
        }
    }
}

/// Render a sibling sequence, wrapping list item runs in their containers.
///
/// `render` produces the markup of one block; it is called once per rendered
/// block, in order.
pub fn group_siblings<F>(blocks: &[Block], mut render: F) -> String
where
    F: FnMut(&Block) -> String,
{
    let mut bulleted = ListGroup::new(ListKind::Bulleted);
    let mut numbered = ListGroup::new(ListKind::Numbered);
    let mut out = String::new();

    for block in blocks {
        let kind = block.kind();
        if kind == BlockKind::TableRow {
            continue;
        }

        let list = ListKind::of(&kind);
        // Close before open so different list kinds never interleave.
        let (closing_first, opening_second) = match list {
            Some(ListKind::Numbered) => (&mut bulleted, &mut numbered),
            _ => (&mut numbered, &mut bulleted),
        };
        closing_first.step(list, &mut out);
        opening_second.step(list, &mut out);

        if matches!(&kind, BlockKind::Unsupported(name) if name == TABLE_OF_CONTENTS) {
            continue;
        }
        out.push_str(&render(block));
    }

    bulleted.close(&mut out);
    numbered.close(&mut out);
    out
}
