// File: crates/chartview-core/src/color.rs
// Summary: Color classification: per-pass flags, default palette coder, legend entries.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::Serialize;

use crate::host::ColorCoder;

/// Bar palette, in assignment order.
pub const PALETTE: [&str; 8] = [
    "#FF9000", "#5D7CBA", "#A97838", "#8B9BBA", "#FFC77F", "#003EBA", "#29447B", "#543C1C",
];
pub const MIXED_COLOR: &str = "#FFFFFF";
pub const MISSING_COLOR: &str = "#888888";
pub const OTHERS_COLOR: &str = "#AAAAAA";

/// Whether the colors shown are a faithful 1:1 mapping of the keys.
/// Reset once per reconstruct pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ColorCodingFlags {
    pub mixed: bool,
    pub missing: bool,
    pub others: bool,
    pub keys: BTreeSet<String>,
}

/// A special legend row (mixed / missing / others).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendCase {
    pub label: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendStyle {
    Swatches,
    Gradient,
}

/// Palette coder assigning colors to keys in first-seen order.
#[derive(Debug, Default)]
pub struct DefaultColorCoder {
    assigned: RefCell<IndexMap<String, Option<&'static str>>>,
}

impl DefaultColorCoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Palette color for `key`, or `None` once the palette is exhausted.
    fn color_of(&self, key: &str) -> Option<&'static str> {
        let mut assigned = self.assigned.borrow_mut();
        if let Some(c) = assigned.get(key) {
            return *c;
        }
        let c = PALETTE.get(assigned.len()).copied();
        assigned.insert(key.to_string(), c);
        c
    }
}

impl ColorCoder for DefaultColorCoder {
    fn translate_set(&self, keys: &BTreeSet<String>, flags: &mut ColorCodingFlags) -> String {
        if keys.is_empty() {
            flags.missing = true;
            return MISSING_COLOR.to_string();
        }
        let mut colors: BTreeSet<&'static str> = BTreeSet::new();
        for key in keys {
            flags.keys.insert(key.clone());
            match self.color_of(key) {
                Some(c) => colors.insert(c),
                None => {
                    flags.others = true;
                    colors.insert(OTHERS_COLOR)
                }
            };
        }
        if colors.len() > 1 {
            flags.mixed = true;
            return MIXED_COLOR.to_string();
        }
        colors.first().copied().unwrap_or(MISSING_COLOR).to_string()
    }

    fn translate(&self, key: &str) -> Option<String> {
        self.assigned.borrow().get(key).copied().flatten().map(str::to_string)
    }

    fn mixed_case(&self) -> LegendCase {
        LegendCase { label: "Mixed".into(), color: MIXED_COLOR.into() }
    }

    fn missing_case(&self) -> LegendCase {
        LegendCase { label: "Missing".into(), color: MISSING_COLOR.into() }
    }

    fn others_case(&self) -> LegendCase {
        LegendCase { label: "Others".into(), color: OTHERS_COLOR.into() }
    }
}

/// Picks an item's display color: through the coder when a color key is bound,
/// otherwise the configured static color.
pub struct ColorClassifier {
    coder: Option<Rc<dyn ColorCoder>>,
    fallback: String,
}

impl ColorClassifier {
    pub fn new(coder: Option<Rc<dyn ColorCoder>>, fallback: impl Into<String>) -> Self {
        Self { coder, fallback: fallback.into() }
    }

    pub fn is_bound(&self) -> bool {
        self.coder.is_some()
    }

    pub fn coder(&self) -> Option<&Rc<dyn ColorCoder>> {
        self.coder.as_ref()
    }

    /// `keys` is `None` when no color key accessor is bound.
    pub fn classify(&self, keys: Option<&BTreeSet<String>>, flags: &mut ColorCodingFlags) -> String {
        match (&self.coder, keys) {
            (Some(coder), Some(keys)) => coder.translate_set(keys, flags),
            _ => self.fallback.clone(),
        }
    }
}

/// Legend rows for the keys seen during a pass plus the special cases flagged.
pub fn legend_entries(coder: &dyn ColorCoder, flags: &ColorCodingFlags) -> Vec<LegendEntry> {
    let mut out: Vec<LegendEntry> = flags
        .keys
        .iter()
        .filter_map(|k| coder.translate(k).map(|color| LegendEntry { label: k.clone(), color }))
        .collect();
    let cases = [
        (flags.mixed, coder.mixed_case()),
        (flags.missing, coder.missing_case()),
        (flags.others, coder.others_case()),
    ];
    for (set, case) in cases {
        if set {
            out.push(LegendEntry { label: case.label, color: case.color });
        }
    }
    out
}
