//! Shared primitive types used across the entire engine.

/// A stable, unique identifier for a staff member.
pub type MemberId = String;

/// A stable, unique identifier for a skill in the catalogue.
pub type SkillId = String;

/// A stable, unique identifier for a service offering.
pub type ServiceId = String;

/// Proficiency and interest are assessed on a 1-5 scale;
/// self-reported experience additionally allows 0 (none).
pub type Level = u8;
