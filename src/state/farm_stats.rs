/// Farm statistics record definitions
///
/// This module defines the fixed set of villagers a farm page reports on and
/// the per-farm record assembled from those scores.
use crate::farm_id::FarmId;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Highest friendship score a farm page can report
pub const MAX_SCORE: u8 = 10;

/// A villager whose friendship score is tracked per farm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Villager {
    Abigail,
    Alex,
    Caroline,
    Clint,
    Demetrius,
    Dwarf,
    Elliott,
    Emily,
    Evelyn,
    George,
    Gus,
    Haley,
    Harvey,
    Henchman,
    Jas,
    Jodi,
    Kent,
    Krobus,
    Leah,
    Lewis,
    Linus,
    Marnie,
    Maru,
    Pam,
    Penny,
    Pierre,
    Robin,
    Sam,
    Sandy,
    Sebastian,
    Shane,
    Vincent,
    Willy,
    Wizard,
}

impl Villager {
    /// Every villager, in score-slot order
    pub const ALL: [Villager; 34] = [
        Self::Abigail,
        Self::Alex,
        Self::Caroline,
        Self::Clint,
        Self::Demetrius,
        Self::Dwarf,
        Self::Elliott,
        Self::Emily,
        Self::Evelyn,
        Self::George,
        Self::Gus,
        Self::Haley,
        Self::Harvey,
        Self::Henchman,
        Self::Jas,
        Self::Jodi,
        Self::Kent,
        Self::Krobus,
        Self::Leah,
        Self::Lewis,
        Self::Linus,
        Self::Marnie,
        Self::Maru,
        Self::Pam,
        Self::Penny,
        Self::Pierre,
        Self::Robin,
        Self::Sam,
        Self::Sandy,
        Self::Sebastian,
        Self::Shane,
        Self::Vincent,
        Self::Willy,
        Self::Wizard,
    ];

    /// Number of tracked villagers
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the name as it appears on farm pages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Abigail => "Abigail",
            Self::Alex => "Alex",
            Self::Caroline => "Caroline",
            Self::Clint => "Clint",
            Self::Demetrius => "Demetrius",
            Self::Dwarf => "Dwarf",
            Self::Elliott => "Elliott",
            Self::Emily => "Emily",
            Self::Evelyn => "Evelyn",
            Self::George => "George",
            Self::Gus => "Gus",
            Self::Haley => "Haley",
            Self::Harvey => "Harvey",
            Self::Henchman => "Henchman",
            Self::Jas => "Jas",
            Self::Jodi => "Jodi",
            Self::Kent => "Kent",
            Self::Krobus => "Krobus",
            Self::Leah => "Leah",
            Self::Lewis => "Lewis",
            Self::Linus => "Linus",
            Self::Marnie => "Marnie",
            Self::Maru => "Maru",
            Self::Pam => "Pam",
            Self::Penny => "Penny",
            Self::Pierre => "Pierre",
            Self::Robin => "Robin",
            Self::Sam => "Sam",
            Self::Sandy => "Sandy",
            Self::Sebastian => "Sebastian",
            Self::Shane => "Shane",
            Self::Vincent => "Vincent",
            Self::Willy => "Willy",
            Self::Wizard => "Wizard",
        }
    }

    /// Looks up a villager by the exact name used on farm pages
    ///
    /// Returns None for names outside the tracked set.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Abigail" => Some(Self::Abigail),
            "Alex" => Some(Self::Alex),
            "Caroline" => Some(Self::Caroline),
            "Clint" => Some(Self::Clint),
            "Demetrius" => Some(Self::Demetrius),
            "Dwarf" => Some(Self::Dwarf),
            "Elliott" => Some(Self::Elliott),
            "Emily" => Some(Self::Emily),
            "Evelyn" => Some(Self::Evelyn),
            "George" => Some(Self::George),
            "Gus" => Some(Self::Gus),
            "Haley" => Some(Self::Haley),
            "Harvey" => Some(Self::Harvey),
            "Henchman" => Some(Self::Henchman),
            "Jas" => Some(Self::Jas),
            "Jodi" => Some(Self::Jodi),
            "Kent" => Some(Self::Kent),
            "Krobus" => Some(Self::Krobus),
            "Leah" => Some(Self::Leah),
            "Lewis" => Some(Self::Lewis),
            "Linus" => Some(Self::Linus),
            "Marnie" => Some(Self::Marnie),
            "Maru" => Some(Self::Maru),
            "Pam" => Some(Self::Pam),
            "Penny" => Some(Self::Penny),
            "Pierre" => Some(Self::Pierre),
            "Robin" => Some(Self::Robin),
            "Sam" => Some(Self::Sam),
            "Sandy" => Some(Self::Sandy),
            "Sebastian" => Some(Self::Sebastian),
            "Shane" => Some(Self::Shane),
            "Vincent" => Some(Self::Vincent),
            "Willy" => Some(Self::Willy),
            "Wizard" => Some(Self::Wizard),
            _ => None,
        }
    }

    /// Score slot of this villager inside a `FarmStats` record
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Villager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Friendship scores extracted from one farm page
///
/// Villagers the page does not mention keep a score of 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarmStats {
    farm_id: FarmId,
    scores: [u8; Villager::COUNT],
    fetched_at: DateTime<Utc>,
}

impl FarmStats {
    /// Creates an empty record for a farm
    pub fn new(farm_id: FarmId) -> Self {
        Self {
            farm_id,
            scores: [0; Villager::COUNT],
            fetched_at: Utc::now(),
        }
    }

    pub fn farm_id(&self) -> &FarmId {
        &self.farm_id
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Returns the score recorded for a villager
    pub fn score(&self, villager: Villager) -> u8 {
        self.scores[villager.slot()]
    }

    /// Records a score, clamped to `MAX_SCORE`
    pub fn set_score(&mut self, villager: Villager, score: u8) {
        self.scores[villager.slot()] = score.min(MAX_SCORE);
    }

    /// Iterates over every villager with its score
    pub fn scores(&self) -> impl Iterator<Item = (Villager, u8)> + '_ {
        Villager::ALL.iter().map(move |v| (*v, self.score(*v)))
    }

    /// Returns the scores keyed by villager name
    pub fn scores_by_name(&self) -> BTreeMap<&'static str, u8> {
        self.scores().map(|(v, s)| (v.as_str(), s)).collect()
    }
}
