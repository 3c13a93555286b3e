//! Číselné kódy FIFA feedu -> uzavřené enumy.
//!
//! Both lookups are total: an unknown code is `Unclassified` / `None`,
//! never an error.

/// `MatchStatus` from the calendar endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStatus {
    Finished,
    NotStarted,
    Live,
    Prematch,
    Other(u32),
}

impl MatchStatus {
    pub fn from_code(code: u32) -> Self {
        match code {
            0  => MatchStatus::Finished,
            1  => MatchStatus::NotStarted,
            3  => MatchStatus::Live,
            12 => MatchStatus::Prematch,
            other => MatchStatus::Other(other),
        }
    }

    pub fn is_live(self) -> bool {
        self == MatchStatus::Live
    }
}

/// Semantic notification category of a timeline event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventCategory {
    PeriodStart,
    PeriodEnd,
    Goal,
    OwnGoal,
    YellowCard,
    RedCard,
    PenaltyOutcome,
    Unclassified,
}

/// Every timeline `Type` code the feed is known to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EventType {
    Goal                 = 0,
    YellowCard           = 2,
    StraightRed          = 3,
    SecondYellowRed      = 4,
    Substitution         = 5,
    Penalty              = 6,
    PeriodStart          = 7,
    PeriodEnd            = 8,
    BlockedShot          = 12,
    Foul                 = 14,
    Offside              = 15,
    CornerKick           = 16,
    ShotBlockedAlt       = 17,
    FoulAgainstPlayer    = 18,
    OutOfBounds          = 24,
    EndOfGame            = 26,
    Crossbar             = 32,
    OwnGoal              = 34,
    PenaltyShootout      = 35,
    SecondPenalty        = 36,
    HandBall             = 37,
    FreeKickGoal         = 39,
    FreeKickIndirectGoal = 40,
    PenaltyGoal          = 41,
    SecondPenaltyGoal    = 42,
    FreeKickCrossbar     = 44,
    PenaltyHitCrossbar   = 46,
    PenaltyHitPost       = 51,
    PenaltySaved         = 60,
    PenaltyMissed        = 65,
    FoulPenalty          = 72,
}

impl EventType {
    pub const ALL: [EventType; 31] = [
        EventType::Goal,
        EventType::YellowCard,
        EventType::StraightRed,
        EventType::SecondYellowRed,
        EventType::Substitution,
        EventType::Penalty,
        EventType::PeriodStart,
        EventType::PeriodEnd,
        EventType::BlockedShot,
        EventType::Foul,
        EventType::Offside,
        EventType::CornerKick,
        EventType::ShotBlockedAlt,
        EventType::FoulAgainstPlayer,
        EventType::OutOfBounds,
        EventType::EndOfGame,
        EventType::Crossbar,
        EventType::OwnGoal,
        EventType::PenaltyShootout,
        EventType::SecondPenalty,
        EventType::HandBall,
        EventType::FreeKickGoal,
        EventType::FreeKickIndirectGoal,
        EventType::PenaltyGoal,
        EventType::SecondPenaltyGoal,
        EventType::FreeKickCrossbar,
        EventType::PenaltyHitCrossbar,
        EventType::PenaltyHitPost,
        EventType::PenaltySaved,
        EventType::PenaltyMissed,
        EventType::FoulPenalty,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn category(self) -> EventCategory {
        use EventType::*;
        match self {
            PeriodStart => EventCategory::PeriodStart,
            PeriodEnd   => EventCategory::PeriodEnd,
            Goal | FreeKickGoal | PenaltyGoal => EventCategory::Goal,
            OwnGoal     => EventCategory::OwnGoal,
            YellowCard  => EventCategory::YellowCard,
            StraightRed | SecondYellowRed => EventCategory::RedCard,
            FoulPenalty | PenaltyMissed | PenaltySaved | PenaltyHitCrossbar | PenaltyHitPost => {
                EventCategory::PenaltyOutcome
            }
            // Indirect free-kick and shootout goals stay silent (shootout spam)
            _ => EventCategory::Unclassified,
        }
    }
}

/// Phase of play. Only meaningful for period start/end events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    FirstHalf,
    SecondHalf,
    FirstExtraTime,
    SecondExtraTime,
    PenaltyShootout,
}

impl Period {
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            3  => Some(Period::FirstHalf),
            5  => Some(Period::SecondHalf),
            7  => Some(Period::FirstExtraTime),
            9  => Some(Period::SecondExtraTime),
            11 => Some(Period::PenaltyShootout),
            _  => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Period::FirstHalf       => "1st Half",
            Period::SecondHalf      => "2nd Half",
            Period::FirstExtraTime  => "1st Extra Time",
            Period::SecondExtraTime => "2nd Extra Time",
            Period::PenaltyShootout => "Penalty Kicks",
        }
    }
}

pub fn classify(type_code: u32) -> EventCategory {
    EventType::from_code(type_code)
        .map(EventType::category)
        .unwrap_or(EventCategory::Unclassified)
}

pub fn classify_period(period_code: u32) -> Option<Period> {
    Period::from_code(period_code)
}
