use serde::{Deserialize, Deserializer, Serialize};

/// Opaque reference to a family member. The full member record (birthdate,
/// PIN, avatar, ...) lives outside this crate; the engine only needs a
/// stable id and, for display, an optional name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl MemberRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// Upstream joins deliver member references either as a single object or as
/// a one-element collection, depending on how the query was shaped. This
/// deserializer accepts both (plus null) and normalizes to
/// `Option<MemberRef>` so nothing downstream ever branches on shape.
pub fn member_ref_or_list<'de, D>(deserializer: D) -> Result<Option<MemberRef>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flexible {
        One(MemberRef),
        Many(Vec<MemberRef>),
        None,
    }

    Ok(match Flexible::deserialize(deserializer)? {
        Flexible::One(member) => Some(member),
        Flexible::Many(mut members) => {
            if members.is_empty() {
                None
            } else {
                Some(members.swap_remove(0))
            }
        }
        Flexible::None => None,
    })
}
