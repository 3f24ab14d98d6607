use serde::{Deserialize, Serialize};
use std::fmt;
use strum_macros::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Intern,
    Admin,
}

/// Per-request credential. Interns authenticate with the opaque token
/// issued at login, specialists with their RFZO number.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credential {
    InternToken(String),
    AdminRfzo(String),
}

impl Credential {
    pub fn role(&self) -> Role {
        match self {
            Credential::InternToken(_) => Role::Intern,
            Credential::AdminRfzo(_) => Role::Admin,
        }
    }

    /// Header name and value carrying this credential.
    pub fn header(&self) -> (&'static str, &str) {
        match self {
            Credential::InternToken(token) => ("X-Intern-Token", token),
            Credential::AdminRfzo(rfzo) => ("X-RFZO", rfzo),
        }
    }
}

// Keep secrets out of logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({}, len={})", self.role(), self.header().1.len())
    }
}

/// Who is using the client. Passed explicitly to everything that needs to
/// authenticate instead of being looked up from ambient storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub student_id: Option<String>,
    pub credential: Option<Credential>,
}

impl Session {
    pub fn signed_out() -> Self {
        Self::default()
    }

    pub fn intern(student_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            student_id: Some(student_id.into()),
            credential: Some(Credential::InternToken(token.into())),
        }
    }

    pub fn admin(rfzo: impl Into<String>) -> Self {
        Self {
            student_id: None,
            credential: Some(Credential::AdminRfzo(rfzo.into())),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.credential.as_ref().map(Credential::role)
    }

    pub fn is_signed_in(&self) -> bool {
        self.credential.is_some()
    }

    /// The credential to act as an intern, if this session holds one.
    pub fn intern_credential(&self) -> Option<&Credential> {
        self.credential
            .as_ref()
            .filter(|credential| credential.role() == Role::Intern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_out_session_has_no_role() {
        let session = Session::signed_out();
        assert_eq!(session.role(), None);
        assert!(!session.is_signed_in());
        assert!(session.intern_credential().is_none());
    }

    #[test]
    fn admin_session_cannot_act_as_intern() {
        let session = Session::admin("321200918843");
        assert_eq!(session.role(), Some(Role::Admin));
        assert!(session.intern_credential().is_none());
    }

    #[test]
    fn intern_credential_uses_intern_header() {
        let session = Session::intern("2019/0042", "tok-1");
        let credential = session.intern_credential().unwrap();
        assert_eq!(credential.header(), ("X-Intern-Token", "tok-1"));
    }

    #[test]
    fn debug_output_redacts_secret() {
        let rendered = format!("{:?}", Credential::InternToken("super-secret".into()));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("intern"));
    }

    #[test]
    fn session_survives_storage_round_trip() {
        let session = Session::intern("2019/0042", "tok-1");
        let stored = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&stored).unwrap();
        assert_eq!(restored, session);
    }
}
