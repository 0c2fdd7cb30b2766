use crate::cli::CliAuthTokenKey;
use crate::data_store::{StoreError, UserId};
use diesel::deserialize::FromSql;
use diesel::query_builder::bind_collector::RawBytesBindCollector;
use diesel::serialize::ToSql;
use diesel::{AsExpression, FromSqlRow};
use std::fmt::{Display, Formatter};

pub struct EnumMemberNotExistingError {
    pub member_value: i32,
    pub enum_name: &'static str,
}

impl Display for EnumMemberNotExistingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} is not a valid value for the {} enum",
            self.member_value, self.enum_name
        )
    }
}

/// Request-scoped authorization context for data_store access.
///
/// The AuthContext identifies the authenticated user and carries their [Role]. All data_store
/// access functions require an AuthContext and check it for the required [Privilege], so an
/// endpoint cannot accidentally skip the authorization check. An AuthContext can only be created
/// by [crate::data_store::GigStockStoreFacade::get_auth_context_for_session], based on the user
/// referenced by a verified session token, and by cli functions via [AuthContext::create_for_cli].
///
/// There is no process-wide session state; the role is re-read from storage on every request.
pub struct AuthContext {
    user_id: UserId,
    user_name: String,
    role: Role,
}

impl AuthContext {
    /// Create a new AuthContext for a client session.
    ///
    /// This function must only be used by implementations of
    /// [crate::data_store::GigStockStoreFacade::get_auth_context_for_session] after resolving the
    /// verified session token to a stored user account.
    pub(super) fn create_for_session(user_id: UserId, user_name: String, role: Role) -> Self {
        AuthContext {
            user_id,
            user_name,
            role,
        }
    }

    /// Create a new AuthContext for a command line interface functionality, with the Admin role.
    ///
    /// This function must only be used by command line interface functions, not in the context of
    /// the web server!
    pub fn create_for_cli(user_id: UserId, user_name: String, _key: &CliAuthTokenKey) -> Self {
        AuthContext {
            user_id,
            user_name,
            role: Role::Admin,
        }
    }

    /// The id of the authenticated user, used as creator/assigner reference on created rows.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Check if the AuthContext authorizes for the given `privilege`.
    ///
    /// The actual authorization check is delegated to [Privilege::qualifying_roles].
    pub fn has_privilege(&self, privilege: Privilege) -> bool {
        privilege.qualifying_roles().contains(&self.role)
    }

    /// Check if the AuthContext authorizes for the given `privilege`. If not, return an
    /// appropriate PermissionDenied error.
    pub fn check_privilege(&self, privilege: Privilege) -> Result<(), StoreError> {
        if self.has_privilege(privilege) {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied {
                required_privilege: privilege,
            })
        }
    }
}

/// Account roles of user accounts.
///
/// Each role qualifies for a set of [Privilege]s. See [Privilege::qualifying_roles].
#[derive(Debug, Eq, PartialEq, Ord, PartialOrd, Clone, Copy, FromSqlRow, AsExpression)]
#[diesel(sql_type = diesel::sql_types::Integer)]
#[repr(i32)]
pub enum Role {
    User = 1,
    Manager = 2,
    Admin = 3,
}

impl TryFrom<i32> for Role {
    type Error = EnumMemberNotExistingError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Role::User),
            2 => Ok(Role::Manager),
            3 => Ok(Role::Admin),
            value => Err(EnumMemberNotExistingError {
                member_value: value,
                enum_name: "Role",
            }),
        }
    }
}

impl From<Role> for i32 {
    fn from(value: Role) -> Self {
        value as i32
    }
}

impl Role {
    pub fn name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Manager => "Manager",
            Role::Admin => "Admin",
        }
    }
}

impl From<Role> for gigstock_api_types::UserRole {
    fn from(value: Role) -> Self {
        match value {
            Role::User => gigstock_api_types::UserRole::User,
            Role::Manager => gigstock_api_types::UserRole::Manager,
            Role::Admin => gigstock_api_types::UserRole::Admin,
        }
    }
}

impl From<gigstock_api_types::UserRole> for Role {
    fn from(value: gigstock_api_types::UserRole) -> Self {
        match value {
            gigstock_api_types::UserRole::User => Role::User,
            gigstock_api_types::UserRole::Manager => Role::Manager,
            gigstock_api_types::UserRole::Admin => Role::Admin,
        }
    }
}

impl<DB> ToSql<diesel::sql_types::Integer, DB> for Role
where
    DB: diesel::backend::Backend,
    for<'c> DB: diesel::backend::Backend<BindCollector<'c> = RawBytesBindCollector<DB>>,
    i32: ToSql<diesel::sql_types::Integer, DB>,
{
    fn to_sql<'b>(
        &'b self,
        out: &mut diesel::serialize::Output<'b, '_, DB>,
    ) -> diesel::serialize::Result {
        let value: i32 = (*self).into();
        value.to_sql(&mut out.reborrow())
    }
}

impl<DB> FromSql<diesel::sql_types::Integer, DB> for Role
where
    DB: diesel::backend::Backend,
    i32: FromSql<diesel::sql_types::Integer, DB>,
{
    fn from_sql(bytes: DB::RawValue<'_>) -> diesel::deserialize::Result<Self> {
        let x = i32::from_sql(bytes)?;
        x.try_into()
            .map_err(|e: EnumMemberNotExistingError| e.to_string().into())
    }
}

/// Enum of available authorization privileges.
///
/// Each data_store action and web endpoint typically requires a single privilege.
#[derive(Debug, Clone, Copy)]
pub enum Privilege {
    /// Read access to inventory, gigs, venues, contacts and the user directory.
    ShowInventory,
    /// Create and delete assets, warehouses, vendors, products, venues and contacts.
    ManageInventory,
    /// Book gigs with staff and asset assignments.
    ManageGigs,
    /// View aggregated reports.
    ViewReports,
    /// Create user accounts.
    ManageUsers,
}

impl Privilege {
    /// Get the list of [Role]s that qualify for this privilege. Each returned role is individually
    /// sufficient for the privilege.
    ///
    /// This function is our source of truth for authorization!
    pub fn qualifying_roles(&self) -> &'static [Role] {
        match self {
            Privilege::ShowInventory => &[Role::User, Role::Manager, Role::Admin],
            Privilege::ManageInventory => &[Role::Manager, Role::Admin],
            Privilege::ManageGigs => &[Role::Manager, Role::Admin],
            Privilege::ViewReports => &[Role::Manager, Role::Admin],
            Privilege::ManageUsers => &[Role::Admin],
        }
    }
}
