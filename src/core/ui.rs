//=========================================================================
// Menu UI Boundary
//=========================================================================
//
// Immediate-mode menu layouts, rebuilt by the active state node every
// frame from its `handle_ui` hook. The UI backend lays out and draws the
// buttons and reports which one was activated.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::input::InputSystem;

//=== Layout ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: String,
    pub size: f32,
}

/// A vertical list of buttons over an optional background texture.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MenuLayout {
    pub background: Option<String>,
    pub items: Vec<MenuItem>,
}

impl MenuLayout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(mut self, texture: impl Into<String>) -> Self {
        self.background = Some(texture.into());
        self
    }

    pub fn item(mut self, label: impl Into<String>, size: f32) -> Self {
        self.items.push(MenuItem {
            label: label.into(),
            size,
        });
        self
    }
}

//=== MenuUi ==============================================================

pub trait MenuUi {
    /// Lays out and draws `layout` for this frame.
    ///
    /// Returns the index of the item activated this frame, if any.
    fn run(&mut self, layout: &MenuLayout, input: &InputSystem) -> Option<usize>;
}

/// UI backend that draws nothing and never reports activations.
#[derive(Debug, Default)]
pub struct HeadlessUi;

impl MenuUi for HeadlessUi {
    fn run(&mut self, _layout: &MenuLayout, _input: &InputSystem) -> Option<usize> {
        None
    }
}
