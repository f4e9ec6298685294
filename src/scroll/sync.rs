//! Scroll offset synchronization between sibling scroll containers.
//!
//! Setting a container's offset makes the browser fire a scroll event on
//! it, possibly asynchronously. Each axis therefore has a guard: the first
//! event of a frame is the source of truth and is propagated to every
//! other member, after which the guard stays closed until the host calls
//! [`ScrollSync::frame`] from its next animation frame. Events arriving
//! while closed are echoes and only have their offset recorded.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::edges::{has_horizontal_overflow, EdgeShadows};
use crate::error::TableError;
use crate::layout::ColumnLayout;

/// Vertically synchronized panels
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum VerticalPanel {
    Left,
    Center,
    Right,
}

/// Horizontally synchronized parts of the scrollable panel
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HorizontalPart {
    Header,
    Body,
    /// Dedicated scrollbar, attached only while content overflows
    Scrollbar,
}

impl FromStr for VerticalPanel {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(TableError::Other(format!("unknown vertical panel: {other}"))),
        }
    }
}

impl FromStr for HorizontalPart {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(Self::Header),
            "body" => Ok(Self::Body),
            "scrollbar" => Ok(Self::Scrollbar),
            other => Err(TableError::Other(format!("unknown horizontal part: {other}"))),
        }
    }
}

/// Offset the host must apply to a member
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrollCommand<M> {
    pub target: M,
    pub offset: f32,
}

/// What a scroll event led to
#[derive(Debug, Clone, PartialEq)]
pub enum ScrollOutcome<M> {
    /// Source of truth for this frame; apply the commands
    Propagate(Vec<ScrollCommand<M>>),
    /// Echo of a programmatic scroll while the guard is closed
    Suppressed,
    /// Event from a member that is not attached
    Ignored,
}

impl<M> ScrollOutcome<M> {
    pub fn commands(&self) -> &[ScrollCommand<M>] {
        match self {
            Self::Propagate(commands) => commands,
            Self::Suppressed | Self::Ignored => &[],
        }
    }

    pub fn into_commands(self) -> Vec<ScrollCommand<M>> {
        match self {
            Self::Propagate(commands) => commands,
            Self::Suppressed | Self::Ignored => Vec::new(),
        }
    }
}

/// Members sharing one scroll offset
#[derive(Debug, Clone)]
pub struct ScrollGroup<M> {
    members: Vec<(M, f32)>,
    locked: bool,
}

impl<M> Default for ScrollGroup<M> {
    fn default() -> Self {
        Self {
            members: Vec::new(),
            locked: false,
        }
    }
}

impl<M: Copy + PartialEq + fmt::Debug> ScrollGroup<M> {
    pub fn new(members: impl IntoIterator<Item = M>) -> Self {
        let mut group = Self::default();
        for member in members {
            group.attach(member);
        }
        group
    }

    /// Attach a member at the group's current offset.
    pub fn attach(&mut self, member: M) {
        if self.is_attached(member) {
            return;
        }
        let offset = self.members.first().map_or(0.0, |(_, o)| *o);
        self.members.push((member, offset));
    }

    pub fn detach(&mut self, member: M) {
        self.members.retain(|(m, _)| *m != member);
    }

    pub fn is_attached(&self, member: M) -> bool {
        self.members.iter().any(|(m, _)| *m == member)
    }

    pub fn offset(&self, member: M) -> Option<f32> {
        self.members
            .iter()
            .find(|(m, _)| *m == member)
            .map(|(_, o)| *o)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn handle_scroll(&mut self, source: M, offset: f32) -> ScrollOutcome<M> {
        let Some(slot) = self.members.iter_mut().find(|(m, _)| *m == source) else {
            return ScrollOutcome::Ignored;
        };
        slot.1 = offset;

        if self.locked {
            log::debug!("suppressed scroll echo from {source:?}");
            return ScrollOutcome::Suppressed;
        }

        let commands: Vec<ScrollCommand<M>> = self
            .members
            .iter_mut()
            .filter(|(m, _)| *m != source)
            .map(|(m, o)| {
                *o = offset;
                ScrollCommand { target: *m, offset }
            })
            .collect();

        if !commands.is_empty() {
            self.locked = true;
        }
        ScrollOutcome::Propagate(commands)
    }

    /// Reopen the guard; called once per animation frame.
    pub fn release(&mut self) {
        self.locked = false;
    }
}

/// Both scroll axes of a table plus its horizontal overflow state
#[derive(Debug, Clone)]
pub struct ScrollSync {
    vertical: ScrollGroup<VerticalPanel>,
    horizontal: ScrollGroup<HorizontalPart>,
    content_width: f32,
    client_width: f32,
    shadows: EdgeShadows,
}

impl ScrollSync {
    pub fn new(has_left: bool, has_right: bool) -> Self {
        let mut vertical = ScrollGroup::new([VerticalPanel::Center]);
        if has_left {
            vertical.attach(VerticalPanel::Left);
        }
        if has_right {
            vertical.attach(VerticalPanel::Right);
        }
        Self {
            vertical,
            horizontal: ScrollGroup::new([HorizontalPart::Header, HorizontalPart::Body]),
            content_width: 0.0,
            client_width: 0.0,
            shadows: EdgeShadows::default(),
        }
    }

    /// Attach frozen panels according to a resolved layout.
    pub fn for_layout(layout: &ColumnLayout) -> Self {
        Self::new(
            layout.frozen_left().next().is_some(),
            layout.frozen_right().next().is_some(),
        )
    }

    /// Attach or detach the frozen panels after a layout change.
    pub fn set_frozen(&mut self, has_left: bool, has_right: bool) {
        for (panel, present) in [
            (VerticalPanel::Left, has_left),
            (VerticalPanel::Right, has_right),
        ] {
            if present {
                self.vertical.attach(panel);
            } else {
                self.vertical.detach(panel);
            }
        }
    }

    pub fn scroll_vertical(
        &mut self,
        source: VerticalPanel,
        offset: f32,
    ) -> ScrollOutcome<VerticalPanel> {
        self.vertical.handle_scroll(source, offset)
    }

    /// Edge shadows are refreshed on every horizontal event, echoes included.
    pub fn scroll_horizontal(
        &mut self,
        source: HorizontalPart,
        offset: f32,
    ) -> ScrollOutcome<HorizontalPart> {
        let outcome = self.horizontal.handle_scroll(source, offset);
        if !matches!(outcome, ScrollOutcome::Ignored) {
            self.shadows = EdgeShadows::compute(offset, self.content_width, self.client_width);
        }
        outcome
    }

    /// Release both guards.
    pub fn frame(&mut self) {
        self.vertical.release();
        self.horizontal.release();
    }

    /// Record new scrollable-panel extents.
    ///
    /// Returns whether content overflows horizontally; the dedicated
    /// scrollbar is attached exactly while it does.
    pub fn resize(&mut self, content_width: f32, client_width: f32) -> bool {
        self.content_width = content_width;
        self.client_width = client_width;
        let overflow = self.has_overflow();
        if overflow {
            self.horizontal.attach(HorizontalPart::Scrollbar);
        } else {
            self.horizontal.detach(HorizontalPart::Scrollbar);
        }
        let left = self.horizontal_offset();
        self.shadows = EdgeShadows::compute(left, content_width, client_width);
        overflow
    }

    pub fn has_overflow(&self) -> bool {
        has_horizontal_overflow(self.content_width, self.client_width)
    }

    pub fn scrollbar_visible(&self) -> bool {
        self.horizontal.is_attached(HorizontalPart::Scrollbar)
    }

    pub fn shadows(&self) -> EdgeShadows {
        self.shadows
    }

    pub fn vertical_offset(&self) -> f32 {
        self.vertical.offset(VerticalPanel::Center).unwrap_or(0.0)
    }

    pub fn horizontal_offset(&self) -> f32 {
        self.horizontal.offset(HorizontalPart::Body).unwrap_or(0.0)
    }

    pub fn vertical(&self) -> &ScrollGroup<VerticalPanel> {
        &self.vertical
    }

    pub fn horizontal(&self) -> &ScrollGroup<HorizontalPart> {
        &self.horizontal
    }
}
