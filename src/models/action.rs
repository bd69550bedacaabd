use super::UniqueId;

/// What happens when a button or select menu option is used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ActionType {
    #[default]
    TextResponse,
    ToggleRole,
    AddRole,
    RemoveRole,
    SavedMessageResponse,
    TextDm,
    SavedMessageDm,
    TextEdit,
    SavedMessageEdit,
    PermissionCheck,
}

impl ActionType {
    pub fn wire_value(self) -> u8 {
        match self {
            Self::TextResponse => 1,
            Self::ToggleRole => 2,
            Self::AddRole => 3,
            Self::RemoveRole => 4,
            Self::SavedMessageResponse => 5,
            Self::TextDm => 6,
            Self::SavedMessageDm => 7,
            Self::TextEdit => 8,
            Self::SavedMessageEdit => 9,
            Self::PermissionCheck => 10,
        }
    }

    pub fn from_wire(value: u8) -> Option<Self> {
        Some(match value {
            1 => Self::TextResponse,
            2 => Self::ToggleRole,
            3 => Self::AddRole,
            4 => Self::RemoveRole,
            5 => Self::SavedMessageResponse,
            6 => Self::TextDm,
            7 => Self::SavedMessageDm,
            8 => Self::TextEdit,
            9 => Self::SavedMessageEdit,
            10 => Self::PermissionCheck,
            _ => return None,
        })
    }

    pub fn is_text(self) -> bool {
        matches!(self, Self::TextResponse | Self::TextDm | Self::TextEdit)
    }

    pub fn is_role(self) -> bool {
        matches!(self, Self::ToggleRole | Self::AddRole | Self::RemoveRole)
    }

    pub fn is_saved_message(self) -> bool {
        matches!(
            self,
            Self::SavedMessageResponse | Self::SavedMessageDm | Self::SavedMessageEdit
        )
    }

    pub fn has_target(self) -> bool {
        self.is_role() || self.is_saved_message()
    }
}

/// One step of an action set. Which fields are meaningful depends on `kind`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Action {
    pub id: UniqueId,
    pub kind: ActionType,
    pub text: String,
    pub target_id: String,
    pub public: bool,
    pub allow_role_mentions: bool,
    pub disable_default_response: bool,
    pub permissions: String,
    pub role_ids: Vec<String>,
}

impl Action {
    /// A blank action of the given type.
    pub fn of_type(kind: ActionType, id: UniqueId) -> Self {
        let mut action = Self {
            id,
            kind,
            ..Self::default()
        };
        if kind == ActionType::PermissionCheck {
            action.permissions = "0".to_string();
        }
        action
    }

    pub fn text_response(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::of_type(ActionType::TextResponse, UniqueId::UNSET)
        }
    }

    pub fn accepts_text(&self) -> bool {
        self.kind.is_text()
            || (self.kind == ActionType::PermissionCheck && self.disable_default_response)
    }

    pub fn accepts_target(&self) -> bool {
        self.kind.has_target()
    }

    pub fn accepts_public(&self) -> bool {
        self.kind != ActionType::PermissionCheck
    }

    pub fn accepts_disable_default_response(&self) -> bool {
        self.kind.is_role() || self.kind == ActionType::PermissionCheck
    }
}

/// Actions run, in order, for one button or select menu option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionSet {
    pub actions: Vec<Action>,
}
