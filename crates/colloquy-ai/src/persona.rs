//! Built-in assistant personas.

use crate::PersonaKind;

/// A fixed system instruction plus the label shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Persona {
    pub kind: PersonaKind,
    pub label: &'static str,
    pub system_prompt: &'static str,
}

impl Persona {
    pub const INGRES: Persona = Persona {
        kind: PersonaKind::Ingres,
        label: "INGRES Assistant",
        system_prompt: "You are 'INGRES Assistant', a helpful and friendly virtual assistant \
            specialized in the INGRES relational database management system (RDBMS). \
            Your role is to provide clear, accurate, and concise answers to questions about \
            INGRES, its features, SQL queries related to it, and general database concepts. \
            If a question is outside of this scope, politely state that you specialize in \
            INGRES and cannot answer.",
    };

    pub const GENERAL: Persona = Persona {
        kind: PersonaKind::General,
        label: "General Assistant",
        system_prompt: "You are a helpful and friendly virtual assistant. \
            Give clear, accurate, and concise answers.",
    };

    pub fn for_kind(kind: PersonaKind) -> Self {
        match kind {
            PersonaKind::Ingres => Self::INGRES,
            PersonaKind::General => Self::GENERAL,
        }
    }
}

impl From<PersonaKind> for Persona {
    fn from(kind: PersonaKind) -> Self {
        Self::for_kind(kind)
    }
}

impl Default for Persona {
    fn default() -> Self {
        Self::INGRES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_kind_maps_to_its_persona() {
        for persona in [Persona::INGRES, Persona::GENERAL] {
            assert_eq!(Persona::for_kind(persona.kind), persona);
        }
    }

    #[test]
    fn personas_have_distinct_prompts() {
        assert_ne!(Persona::INGRES.system_prompt, Persona::GENERAL.system_prompt);
        assert!(Persona::INGRES.system_prompt.contains("INGRES"));
        assert!(!Persona::GENERAL.system_prompt.contains("INGRES"));
    }

    #[test]
    fn default_is_database_persona() {
        assert_eq!(Persona::default().kind, PersonaKind::Ingres);
    }
}
