// src/matrix/case.rs

//! Test case representation and rendering

use crate::resolver::VersionSlot;
use std::fmt;

/// One dependency's assignment within a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin<'a> {
    pub name: &'a str,
    pub slot: &'a VersionSlot,
}

impl Pin<'_> {
    /// `name==version`, or `None` when the dependency is omitted
    pub fn as_requirement(&self) -> Option<String> {
        self.slot
            .release()
            .map(|version| format!("{}=={}", self.name, version))
    }
}

/// A full set of pins, one per dependency in manifest order
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestCase<'a> {
    pins: Vec<Pin<'a>>,
}

impl<'a> TestCase<'a> {
    pub fn new(pins: Vec<Pin<'a>>) -> Self {
        Self { pins }
    }

    pub fn pins(&self) -> &[Pin<'a>] {
        &self.pins
    }

    /// Look up the slot pinned for `name`
    pub fn slot(&self, name: &str) -> Option<&'a VersionSlot> {
        self.pins.iter().find(|p| p.name == name).map(|p| p.slot)
    }

    /// Space-separated requirements; omitted dependencies leave no gap
    pub fn render(&self) -> String {
        self.pins
            .iter()
            .filter_map(Pin::as_requirement)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for TestCase<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}
