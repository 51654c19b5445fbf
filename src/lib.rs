pub mod blood;
pub mod design;
pub mod error;
pub mod pk;
pub mod planner;
pub mod sizing;
pub mod tables;
pub mod timeline;

pub use crate::blood::{BloodBudget, BloodPlan, SamplingScheduleGenerator};
pub use crate::design::{DesignPlan, DesignSelector, DesignType, IntakeMode};
pub use crate::pk::{PkEstimate, PkInputs, ReleaseType};
pub use crate::planner::{Overrides, StudyPlanner, StudyProtocolPlan};
pub use crate::sizing::{SampleSizeCalculator, SampleSizePlan, SampleSizeRequest};
pub use crate::tables::{ReferenceTable, TableKey, TableStore};
pub use crate::timeline::{Timeline, TimelineScheduler};
pub use error::PlanningError;

pub mod prelude {
    pub mod design {
        pub use crate::design::{
            AcceptanceLimits, DesignPlan, DesignSelector, DesignType, DropoutEstimate, IntakeMode,
            Washout,
        };
    }
    pub mod sizing {
        pub use crate::sizing::{
            select_method, SampleSizeCalculator, SampleSizePlan, SampleSizeRequest, SizingMethod,
            SweepPoint,
        };
        pub use crate::tables::{ReferenceTable, TableKey, TableStore};
    }
    pub mod blood {
        pub use crate::blood::{
            format_sampling_times, sampling_duration, BloodBudget, BloodPlan, BloodRequest,
            SamplingScheduleGenerator,
        };
    }

    pub use crate::design::{DesignType, IntakeMode};
    pub use crate::pk::{PkEstimate, PkInputs, PkProvenance, ReleaseType};
    pub use crate::planner::{
        BloodScheduler, DayTimeline, Overrides, StandardBloodScheduler, StudyPlanner,
        StudyProtocolPlan, TimelineBuilder, ValidatedOverrides,
    };
    pub use crate::timeline::{PkPeriod, Timeline, TimelineScheduler, Visit};
    pub use crate::PlanningError;
}
