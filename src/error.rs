/*

    Error types for fitting and bound editing commands.

    @date: Oct, 2025
    @author: bartu
*/

use thiserror::Error;

use crate::bounds::SollumType;

/// Failure of the bounding-primitive fitter.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitError {
    /// No points were given to fit against
    #[error("Cannot fit a primitive to an empty point set")]
    EmptyPointSet,
}

/// How a rejected command should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
}

/// Reasons a bound editing command is cancelled.
///
/// A cancelled command leaves the scene untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error(transparent)]
    Fit(#[from] FitError),

    #[error("No active object")]
    NoActiveObject,

    #[error("Cannot parent an object to itself or to one of its children")]
    ParentCycle,

    /// Referenced object is not part of the scene
    #[error("Object is not in the scene")]
    MissingObject,

    #[error("Please select a Bound Composite to add a {requested} to.")]
    ActiveNotComposite { requested: SollumType },

    #[error("Please select a Geometry Bound BVH or Geometry Bound to add a {requested} to.")]
    ActiveNotGeometry { requested: SollumType },

    #[error("No object with mesh data selected!")]
    NotAMesh,

    #[error("Operator can only be ran in edit mode!")]
    NotInEditMode,

    #[error("Must specify a parent object!")]
    MissingParent,

    #[error("Parent must be a Geometry Bound BVH or Geometry Bound!")]
    InvalidParent,

    #[error("No vertices selected.")]
    NoVerticesSelected,

    #[error("No collision material found for {0}")]
    UnknownMaterial(String),
}

impl CommandError {
    pub fn report_level(&self) -> ReportLevel {
        match self {
            CommandError::ActiveNotComposite { .. }
            | CommandError::ActiveNotGeometry { .. }
            | CommandError::NoVerticesSelected
            | CommandError::NoActiveObject => ReportLevel::Info,

            CommandError::Fit(_)
            | CommandError::MissingObject
            | CommandError::ParentCycle
            | CommandError::NotAMesh
            | CommandError::NotInEditMode
            | CommandError::MissingParent
            | CommandError::InvalidParent
            | CommandError::UnknownMaterial(_) => ReportLevel::Warning,
        }
    }
}

pub type CommandResult<T> = Result<T, CommandError>;
