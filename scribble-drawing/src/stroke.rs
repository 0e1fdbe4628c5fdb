//! Stroke elements stored in the shared drawing sequence.
//!
//! The sequence is a root `yrs` array. Each element is a `yrs` map:
//!
//! ```text
//! { color: "#333", type: "path", coordinate: {x, y}, path: Y.Array<{x, y}> }
//! ```
//!
//! Coordinates are normalised to the canvas box (0..1 on both axes).
//! Insertion order is the z-order: later strokes draw on top.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use yrs::types::ToJson;
use yrs::{
    Any, Array, ArrayPrelim, ArrayRef, DeepObservable, Doc, Map, MapPrelim, MapRef, Out, ReadTxn,
    Subscription, Transact,
};

/// Root array holding the drawing.
pub const CONTENT_NAME: &str = "drawing";

/// Value of the `type` key for freehand strokes.
pub const PATH_TYPE: &str = "path";

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    fn to_any(self) -> Any {
        let fields = HashMap::from([
            ("x".to_string(), Any::Number(self.x)),
            ("y".to_string(), Any::Number(self.y)),
        ]);
        Any::Map(Arc::new(fields))
    }

    fn from_any(any: &Any) -> Option<Point> {
        let Any::Map(fields) = any else {
            return None;
        };
        let number = |key: &str| match fields.get(key) {
            Some(Any::Number(n)) => Some(*n),
            Some(Any::BigInt(n)) => Some(*n as f64),
            _ => None,
        };
        Some(Point::new(number("x")?, number("y")?))
    }
}

/// A stroke as read back from the shared sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// First point of the stroke.
    pub coordinate: Point,
    /// Every point after the first, in input order.
    pub path: Vec<Point>,
}

fn read_stroke<T: ReadTxn>(txn: &T, element: &MapRef) -> Option<Stroke> {
    let string = |key: &str| match element.get(txn, key) {
        Some(Out::Any(Any::String(s))) => Some(s.to_string()),
        _ => None,
    };
    let kind = string("type")?;
    if kind != PATH_TYPE {
        return None;
    }
    let color = string("color").unwrap_or_default();
    let coordinate = match element.get(txn, "coordinate") {
        Some(Out::Any(any)) => Point::from_any(&any)?,
        _ => return None,
    };
    let Some(Out::YArray(path)) = element.get(txn, "path") else {
        return None;
    };
    let path = path
        .iter(txn)
        .filter_map(|point| match point {
            Out::Any(any) => Point::from_any(&any),
            _ => None,
        })
        .collect();
    Some(Stroke {
        color,
        kind,
        coordinate,
        path,
    })
}

fn read_strokes<T: ReadTxn>(txn: &T, content: &ArrayRef) -> Vec<Stroke> {
    content
        .iter(txn)
        .filter_map(|element| match element {
            Out::YMap(map) => read_stroke(txn, &map),
            _ => None,
        })
        .collect()
}

/// Handle to the shared drawing sequence of one document.
#[derive(Clone)]
pub struct SharedDrawing {
    doc: Doc,
    content: ArrayRef,
}

impl SharedDrawing {
    pub fn new(doc: Doc) -> Self {
        let content = doc.get_or_insert_array(CONTENT_NAME);
        Self { doc, content }
    }

    pub fn doc(&self) -> &Doc {
        &self.doc
    }

    /// Append a new stroke and return its (empty) path for later points.
    ///
    /// The stroke is visible to every participant as soon as this returns.
    pub fn begin_stroke(&self, color: &str, at: Point) -> ArrayRef {
        let mut txn = self.doc.transact_mut();
        let element: MapRef = self.content.push_back(&mut txn, MapPrelim::default());
        element.insert(&mut txn, "color", color);
        element.insert(&mut txn, "type", PATH_TYPE);
        element.insert(&mut txn, "coordinate", at.to_any());
        element.insert(&mut txn, "path", ArrayPrelim::default())
    }

    /// Append `at` to an open stroke's path.
    pub fn extend_stroke(&self, path: &ArrayRef, at: Point) {
        let mut txn = self.doc.transact_mut();
        path.push_back(&mut txn, at.to_any());
    }

    /// Remove every stroke in one range delete.
    pub fn clear(&self) {
        let mut txn = self.doc.transact_mut();
        let len = self.content.len(&txn);
        if len > 0 {
            self.content.remove_range(&mut txn, 0, len);
        }
    }

    pub fn len(&self) -> u32 {
        self.content.len(&self.doc.transact())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn strokes(&self) -> Vec<Stroke> {
        read_strokes(&self.doc.transact(), &self.content)
    }

    /// Raw JSON form of the sequence, including non-stroke elements.
    pub fn to_json(&self) -> String {
        let txn = self.doc.transact();
        let mut out = String::new();
        self.content.to_json(&txn).to_json(&mut out);
        out
    }

    /// Call `f` after every change anywhere inside the sequence.
    ///
    /// Dropping the returned subscription unregisters `f`.
    pub fn subscribe<F>(&self, f: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.content.observe_deep(move |_txn, _events| f())
    }

    /// Like [`subscribe`](Self::subscribe), with the strokes as of the change.
    pub fn subscribe_strokes<F>(&self, f: F) -> Subscription
    where
        F: Fn(&[Stroke]) + 'static,
    {
        let content = self.content.clone();
        self.content
            .observe_deep(move |txn, _events| f(&read_strokes(txn, &content)))
    }
}
