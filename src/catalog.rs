use crate::pipeline::types::MonumentClass;
use serde::Serialize;

/// Display metadata for a monument. Only the presentation layer reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonumentInfo {
    pub name: &'static str,
    pub location: &'static str,
}

/// Read-only lookup from class to display metadata, one entry per class in
/// declaration order.
#[derive(Debug, Clone)]
pub struct MonumentCatalog {
    entries: [MonumentInfo; MonumentClass::COUNT],
}

impl MonumentCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: MonumentClass::ALL.map(builtin_info),
        }
    }

    pub fn lookup(&self, class: MonumentClass) -> MonumentInfo {
        self.entries[class.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (MonumentClass, &MonumentInfo)> {
        MonumentClass::ALL.into_iter().zip(self.entries.iter())
    }
}

impl Default for MonumentCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_info(class: MonumentClass) -> MonumentInfo {
    let (name, location) = match class {
        MonumentClass::Gateway => ("Gateway of India", "Mumbai, India"),
        MonumentClass::TajMahal => ("Taj Mahal", "Agra, India"),
        MonumentClass::HawaMahal => ("Hawa Mahal", "Jaipur, India"),
        MonumentClass::SardarPatelStatue => ("Sardar Patel Statue", "Gujarat, India"),
        MonumentClass::MysorePalace => ("Mysore Palace", "Karnataka, India"),
    };
    MonumentInfo { name, location }
}
