use uuid::Uuid;

use crate::models::{Event, FamilyRole, OccurrenceScope};

/// How the acting member relates to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Creator,
    Participant,
    Other,
}

impl Relation {
    pub fn of(member_id: Uuid, event: &Event) -> Self {
        if event.created_by == member_id {
            Relation::Creator
        } else if event.has_participant(member_id) {
            Relation::Participant
        } else {
            Relation::Other
        }
    }
}

/// Whether a family member may edit or delete occurrences with `scope`.
pub fn may_edit(role: FamilyRole, relation: Relation, scope: OccurrenceScope) -> bool {
    match (role, relation, scope) {
        (FamilyRole::Admin, _, _) | (FamilyRole::Parent, _, _) => true,
        (FamilyRole::Child, Relation::Creator, _) => true,
        (FamilyRole::Child, Relation::Participant, OccurrenceScope::This) => true,
        (FamilyRole::Child, Relation::Participant, OccurrenceScope::ThisAndFollowing)
        | (FamilyRole::Child, Relation::Participant, OccurrenceScope::All)
        | (FamilyRole::Child, Relation::Other, _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(FamilyRole::Admin, Relation::Other, OccurrenceScope::All, true)]
    #[case(FamilyRole::Parent, Relation::Other, OccurrenceScope::ThisAndFollowing, true)]
    #[case(FamilyRole::Child, Relation::Creator, OccurrenceScope::All, true)]
    #[case(FamilyRole::Child, Relation::Participant, OccurrenceScope::This, true)]
    #[case(FamilyRole::Child, Relation::Participant, OccurrenceScope::ThisAndFollowing, false)]
    #[case(FamilyRole::Child, Relation::Participant, OccurrenceScope::All, false)]
    #[case(FamilyRole::Child, Relation::Other, OccurrenceScope::This, false)]
    fn test_may_edit(
        #[case] role: FamilyRole,
        #[case] relation: Relation,
        #[case] scope: OccurrenceScope,
        #[case] expected: bool,
    ) {
        assert_eq!(may_edit(role, relation, scope), expected);
    }
}
