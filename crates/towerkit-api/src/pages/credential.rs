use crate::kind::PageKind;

page_view!(Credential, "credential", |kind| kind == PageKind::Credential);

impl Credential {
    /// Passwords a job launched with this credential will prompt for
    pub fn expected_passwords_needed_to_start(&self) -> Vec<String> {
        ["password", "become_password", "ssh_key_unlock", "vault_password"]
            .iter()
            .filter(|field| self.str_field(field) == Some("ASK"))
            .map(|field| match *field {
                "password" => "ssh_password".to_string(),
                other => other.to_string(),
            })
            .collect()
    }
}
