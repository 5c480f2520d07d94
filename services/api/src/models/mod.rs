//! Entity models: the application-side record shapes
//!
//! Each entity has the persisted record, a `New*` creation payload
//! (identifiers originate in the store, never locally), and where partial
//! updates are supported an `Update*` payload whose omitted fields stay
//! untouched.

pub mod attendance;
pub mod donation;
pub mod equipment;
pub mod member;
pub mod template;
pub mod visitor;

// Re-export for convenience
pub use attendance::{AttendanceRecord, NewAttendanceRecord, ServiceType};
pub use donation::{Donation, DonationCategory, NewDonation, PaymentMethod};
pub use equipment::{Condition, Equipment, NewEquipment, UpdateEquipment};
pub use member::{BaptismStatus, Department, Member, MemberStatus, NewMember, UpdateMember};
pub use template::{MessageTemplate, NewMessageTemplate, TemplateType};
pub use visitor::{FollowUpStatus, NewVisitor, Visitor};
