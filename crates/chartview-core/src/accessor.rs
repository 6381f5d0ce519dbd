// File: crates/chartview-core/src/accessor.rs
// Summary: Accessor chain (proxy -> xy, color keys) resolved once from the configured bindings.

use std::collections::BTreeSet;

use crate::config::{Bindings, XyBinding};
use crate::error::{ChartError, Result};
use crate::host::Database;
use crate::types::{AxisTuple, ItemId, Value, XValue};

/// Per-item value extraction used inside the reconstruct loop.
pub trait ItemAccessor {
    /// Item that values are read from (the item itself unless a proxy is bound).
    fn proxy(&self, db: &dyn Database, item: &str) -> ItemId;
    /// Tuples of the already-proxied item.
    fn xy(&self, db: &dyn Database, proxy: &str) -> Vec<AxisTuple>;
    /// `None` when no color key is bound.
    fn color_keys(&self, db: &dyn Database, item: &str) -> Option<BTreeSet<String>>;

    /// Proxy indirection followed by tuple extraction.
    fn resolve_xy(&self, db: &dyn Database, item: &str) -> Vec<AxisTuple> {
        let proxy = self.proxy(db, item);
        self.xy(db, &proxy)
    }
}

#[derive(Clone, Debug)]
enum XyStrategy {
    Records { attribute: String },
    Columns { values: Vec<String>, label: String },
}

/// Bindings resolved into a fixed strategy; no shape sniffing per item.
#[derive(Clone, Debug)]
pub struct ResolvedAccessors {
    proxy: Option<String>,
    xy: XyStrategy,
    color_key: Option<String>,
}

impl ResolvedAccessors {
    pub fn resolve(bindings: &Bindings) -> Result<Self> {
        let xy = match &bindings.xy {
            Some(XyBinding::AxisData { attribute }) => XyStrategy::Records { attribute: attribute.clone() },
            Some(XyBinding::Separate { values, label }) if !values.is_empty() => {
                XyStrategy::Columns { values: values.clone(), label: label.clone() }
            }
            _ => return Err(ChartError::MissingBinding { accessor: "getXY" }),
        };
        Ok(Self { proxy: bindings.proxy.clone(), xy, color_key: bindings.color_key.clone() })
    }

    pub fn has_color_key(&self) -> bool {
        self.color_key.is_some()
    }
}

impl ItemAccessor for ResolvedAccessors {
    fn proxy(&self, db: &dyn Database, item: &str) -> ItemId {
        let Some(attr) = &self.proxy else { return item.to_string() };
        db.values(item, attr)
            .iter()
            .find_map(Value::as_text)
            .unwrap_or_else(|| item.to_string())
    }

    fn xy(&self, db: &dyn Database, proxy: &str) -> Vec<AxisTuple> {
        match &self.xy {
            XyStrategy::Records { attribute } => db
                .values(proxy, attribute)
                .iter()
                .filter_map(tuple_from_record)
                .collect(),
            XyStrategy::Columns { values, label } => {
                let Some(y) = db.values(proxy, label).iter().find_map(Value::as_text) else {
                    return Vec::new();
                };
                if values.len() == 1 {
                    // One value column: every numeric value is its own tuple.
                    return db
                        .values(proxy, &values[0])
                        .iter()
                        .filter_map(Value::as_number)
                        .map(|x| AxisTuple::scalar(x, y.clone()))
                        .collect();
                }
                let mut slots = Vec::with_capacity(values.len());
                for attr in values {
                    match db.values(proxy, attr).iter().find_map(Value::as_number) {
                        Some(v) => slots.push(v),
                        None => return Vec::new(),
                    }
                }
                vec![AxisTuple::stacked(slots, y)]
            }
        }
    }

    fn color_keys(&self, db: &dyn Database, item: &str) -> Option<BTreeSet<String>> {
        let attr = self.color_key.as_ref()?;
        Some(db.values(item, attr).iter().filter_map(Value::as_text).collect())
    }
}

/// `[n, label]` -> scalar, `[n1, n2, .., label]` -> stacked.
fn tuple_from_record(value: &Value) -> Option<AxisTuple> {
    let Value::Record(parts) = value else { return None };
    let (last, head) = parts.split_last()?;
    let y = match last {
        Value::Text(s) => s.clone(),
        _ => return None,
    };
    let nums: Vec<f64> = head.iter().map(Value::as_number).collect::<Option<_>>()?;
    let x = match nums.len() {
        0 => return None,
        1 => XValue::Scalar(nums[0]),
        _ => XValue::Stack(nums),
    };
    Some(AxisTuple { x, y })
}
