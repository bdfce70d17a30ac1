// Typed query layer
// Ad hoc filtering, projection, aggregation, and bulk statements over
// the member/team schema

pub mod members;
