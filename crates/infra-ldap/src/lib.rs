// Memberwatch LDAP Infrastructure - DirectoryGateway adapter

mod directory_gateway;

pub use directory_gateway::{LdapConfig, LdapDirectoryGateway};
