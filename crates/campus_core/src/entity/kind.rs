//! Entity kinds and the common record interface.

use campus_codec::TableName;
use std::fmt;

/// The four identified entity collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    /// A student.
    Student,
    /// A faculty member.
    Faculty,
    /// A course.
    Course,
    /// A department.
    Department,
}

impl EntityKind {
    /// All kinds, in collection order.
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Student,
        EntityKind::Faculty,
        EntityKind::Course,
        EntityKind::Department,
    ];

    /// Returns the lowercase name used in messages and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Student => "student",
            EntityKind::Faculty => "faculty",
            EntityKind::Course => "course",
            EntityKind::Department => "department",
        }
    }

    /// Returns the table this kind is stored in.
    #[must_use]
    pub const fn table(self) -> TableName {
        match self {
            EntityKind::Student => TableName::Students,
            EntityKind::Faculty => TableName::Faculty,
            EntityKind::Course => TableName::Courses,
            EntityKind::Department => TableName::Departments,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common interface of identified entities.
pub trait Record {
    /// Collection this record lives in.
    const KIND: EntityKind;

    /// Returns the record identifier.
    fn id(&self) -> &str;

    /// Returns the display name.
    fn name(&self) -> &str;
}
