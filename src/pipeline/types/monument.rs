use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of monuments the classifier can recognise.
///
/// Declaration order is significant: it is the iteration order of every
/// [`ScoreMap`](super::ScoreMap) and breaks ties between equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonumentClass {
    Gateway = 0,
    TajMahal = 1,
    HawaMahal = 2,
    SardarPatelStatue = 3,
    MysorePalace = 4,
}

impl MonumentClass {
    pub const COUNT: usize = 5;

    pub const ALL: [MonumentClass; Self::COUNT] = [
        MonumentClass::Gateway,
        MonumentClass::TajMahal,
        MonumentClass::HawaMahal,
        MonumentClass::SardarPatelStatue,
        MonumentClass::MysorePalace,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for MonumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MonumentClass::Gateway => "Gateway",
            MonumentClass::TajMahal => "TajMahal",
            MonumentClass::HawaMahal => "HawaMahal",
            MonumentClass::SardarPatelStatue => "SardarPatelStatue",
            MonumentClass::MysorePalace => "MysorePalace",
        };
        f.write_str(label)
    }
}
