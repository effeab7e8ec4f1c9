use service_core::roles::RoleSet;

use crate::error::ClientError;
use crate::models::{AssociationSummary, AvatarFile, Platforms, Profile, ProfileUpdate, Student};
use crate::notifier::Notifier;
use crate::permissions::PermissionFlags;
use crate::services::UserService;

/// Local mirror of the signed-in user.
///
/// Fields change only after the server confirms an action. Every mutating
/// action borrows the session mutably, so at most one is outstanding per
/// session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub id: String,
    pub avatar: Option<String>,
    pub mail: String,
    pub name: Option<String>,
    pub platforms: Platforms,
    pub roles: RoleSet,
    pub student: Student,
    pub username: String,
    pub association: Option<AssociationSummary>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_signed_in(&self) -> bool {
        !self.id.is_empty()
    }

    pub fn flags(&self) -> PermissionFlags {
        PermissionFlags::from(&self.roles)
    }

    pub fn is_admin(&self) -> bool {
        self.roles.is_admin()
    }

    pub fn is_member(&self) -> bool {
        self.roles.is_member()
    }

    pub fn has_federation_right(&self) -> bool {
        self.roles.has_federation_right()
    }

    pub fn has_partners_right(&self) -> bool {
        self.roles.has_partners_right()
    }

    pub fn has_tournament_right(&self) -> bool {
        self.roles.has_tournament_right()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Load the profile from the server.
    ///
    /// Without a reachable server or a valid session the state is left as is.
    /// A payload that cannot be read is returned as an error.
    pub async fn init(&mut self, service: &dyn UserService) -> Result<(), ClientError> {
        match service.ping().await {
            Ok(profile) => {
                self.apply_profile(profile);
                Ok(())
            }
            Err(e) if e.is_transport() => {
                tracing::debug!(error = %e, "No active session");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn apply_profile(&mut self, profile: Profile) {
        self.id = profile.id;
        self.avatar = profile.avatar;
        self.mail = profile.mail;
        self.name = profile.name;
        self.platforms = profile.platforms;
        self.roles = profile.roles;
        self.student = profile.student;
        self.username = profile.username;
        self.association = profile.association;
    }

    /// Ends the session. Local state is cleared even when the server call fails.
    pub async fn disconnect(&mut self, service: &dyn UserService, notifier: &dyn Notifier) {
        let outcome = service.disconnect().await.and_then(|r| accepted(r.success));
        report(notifier, "disconnect", outcome);
        self.reset();
    }

    /// Returns whether the update was applied.
    pub async fn update(
        &mut self,
        service: &dyn UserService,
        notifier: &dyn Notifier,
        delta: ProfileUpdate,
    ) -> bool {
        let outcome = service.update(&delta).await.and_then(|r| accepted(r.success));
        if !report(notifier, "update", outcome) {
            return false;
        }

        self.username = delta.username;
        self.student.name = delta.student.name;
        true
    }

    pub async fn update_platforms(
        &mut self,
        service: &dyn UserService,
        notifier: &dyn Notifier,
        platforms: Platforms,
    ) -> bool {
        let outcome = service
            .update_platforms(&platforms)
            .await
            .and_then(|r| accepted(r.success));
        if !report(notifier, "update-platforms", outcome) {
            return false;
        }

        self.platforms = platforms;
        true
    }

    pub async fn upload_avatar(
        &mut self,
        service: &dyn UserService,
        notifier: &dyn Notifier,
        file: AvatarFile,
    ) -> bool {
        let avatar = match service.upload_avatar(file).await {
            Ok(response) if response.success => response.avatar,
            Ok(_) => {
                report(notifier, "upload-avatar", Err(ClientError::Rejected));
                return false;
            }
            Err(e) => {
                report(notifier, "upload-avatar", Err(e));
                return false;
            }
        };

        self.avatar = avatar;
        true
    }
}

fn accepted(success: bool) -> Result<(), ClientError> {
    if success {
        Ok(())
    } else {
        Err(ClientError::Rejected)
    }
}

fn report(notifier: &dyn Notifier, action: &str, outcome: Result<(), ClientError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            notifier.notify_error(action, &e.to_string());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionResponse, AvatarResponse};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone, Copy, PartialEq)]
    enum Outcome {
        Accept,
        Refuse,
        Unreachable,
        Garbage,
    }

    struct MockUserService {
        outcome: Outcome,
    }

    impl MockUserService {
        fn new(outcome: Outcome) -> Self {
            Self { outcome }
        }

        fn answer(&self) -> Result<ActionResponse, ClientError> {
            match self.outcome {
                Outcome::Accept => Ok(ActionResponse { success: true }),
                Outcome::Refuse => Ok(ActionResponse { success: false }),
                Outcome::Unreachable => Err(ClientError::Status {
                    status: 503,
                    message: "Service unavailable".to_string(),
                }),
                Outcome::Garbage => Err(ClientError::Decode("expected value".to_string())),
            }
        }
    }

    #[async_trait]
    impl UserService for MockUserService {
        async fn ping(&self) -> Result<Profile, ClientError> {
            self.answer().map(|_| profile())
        }

        async fn disconnect(&self) -> Result<ActionResponse, ClientError> {
            self.answer()
        }

        async fn update(&self, _delta: &ProfileUpdate) -> Result<ActionResponse, ClientError> {
            self.answer()
        }

        async fn update_platforms(
            &self,
            _platforms: &Platforms,
        ) -> Result<ActionResponse, ClientError> {
            self.answer()
        }

        async fn upload_avatar(&self, _file: AvatarFile) -> Result<AvatarResponse, ClientError> {
            self.answer().map(|r| AvatarResponse {
                success: r.success,
                avatar: Some("fresh.png".to_string()),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        errors: Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        fn actions(&self) -> Vec<String> {
            self.errors.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify_error(&self, action: &str, _message: &str) {
            self.errors.lock().unwrap().push(action.to_string());
        }
    }

    fn profile() -> Profile {
        Profile {
            id: "u-1".to_string(),
            avatar: Some("old.png".to_string()),
            mail: "u-1@example.org".to_string(),
            name: Some("Camille".to_string()),
            platforms: Platforms {
                discord: "camille#0001".to_string(),
            },
            roles: RoleSet::from_tags(["member", "tournament"]),
            student: Student {
                name: "Camille".to_string(),
                school_name: "IUT Lannion".to_string(),
            },
            username: "camille".to_string(),
            association: Some(AssociationSummary {
                id: "assoc-1".to_string(),
                name: "Esport Club".to_string(),
                slug: Some("esport-club".to_string()),
            }),
        }
    }

    async fn signed_in() -> SessionState {
        let mut session = SessionState::new();
        session
            .init(&MockUserService::new(Outcome::Accept))
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn init_patches_profile_and_association() {
        let session = signed_in().await;

        assert!(session.is_signed_in());
        assert_eq!(session.username, "camille");
        assert_eq!(session.association.as_ref().map(|a| a.id.as_str()), Some("assoc-1"));
        assert!(session.has_tournament_right());
        assert!(!session.has_federation_right());
    }

    #[tokio::test]
    async fn init_without_server_leaves_state_alone() {
        let mut session = SessionState::new();
        let result = session.init(&MockUserService::new(Outcome::Unreachable)).await;

        assert!(result.is_ok());
        assert_eq!(session, SessionState::default());
    }

    #[tokio::test]
    async fn init_surfaces_malformed_payload() {
        let mut session = SessionState::new();
        let result = session.init(&MockUserService::new(Outcome::Garbage)).await;

        assert!(matches!(result, Err(ClientError::Decode(_))));
        assert!(!session.is_signed_in());
    }

    #[tokio::test]
    async fn successful_update_overwrites_exactly_the_sent_fields() {
        let mut session = signed_in().await;
        let before = session.clone();
        let notifier = RecordingNotifier::default();

        let applied = session
            .update(
                &MockUserService::new(Outcome::Accept),
                &notifier,
                ProfileUpdate::new("cam", "Camille D."),
            )
            .await;

        assert!(applied);
        assert_eq!(session.username, "cam");
        assert_eq!(session.student.name, "Camille D.");
        assert_eq!(session.student.school_name, before.student.school_name);
        assert_eq!(session.mail, before.mail);
        assert_eq!(session.platforms, before.platforms);
        assert!(notifier.actions().is_empty());
    }

    #[tokio::test]
    async fn failed_update_leaves_state_unchanged() {
        for outcome in [Outcome::Refuse, Outcome::Unreachable, Outcome::Garbage] {
            let mut session = signed_in().await;
            let before = session.clone();
            let notifier = RecordingNotifier::default();

            let applied = session
                .update(
                    &MockUserService::new(outcome),
                    &notifier,
                    ProfileUpdate::new("cam", "Camille D."),
                )
                .await;

            assert!(!applied);
            assert_eq!(session, before);
            assert_eq!(notifier.actions(), vec!["update".to_string()]);
        }
    }

    #[tokio::test]
    async fn update_platforms_applies_only_on_success() {
        let mut session = signed_in().await;
        let notifier = RecordingNotifier::default();
        let platforms = Platforms {
            discord: "new#4242".to_string(),
        };

        assert!(
            !session
                .update_platforms(
                    &MockUserService::new(Outcome::Refuse),
                    &notifier,
                    platforms.clone()
                )
                .await
        );
        assert_eq!(session.platforms.discord, "camille#0001");

        assert!(
            session
                .update_platforms(&MockUserService::new(Outcome::Accept), &notifier, platforms)
                .await
        );
        assert_eq!(session.platforms.discord, "new#4242");
    }

    #[tokio::test]
    async fn upload_avatar_takes_name_from_response() {
        let mut session = signed_in().await;
        let notifier = RecordingNotifier::default();
        let file = AvatarFile {
            file_name: "me.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        };

        assert!(
            !session
                .upload_avatar(&MockUserService::new(Outcome::Refuse), &notifier, file.clone())
                .await
        );
        assert_eq!(session.avatar.as_deref(), Some("old.png"));

        assert!(
            session
                .upload_avatar(&MockUserService::new(Outcome::Accept), &notifier, file)
                .await
        );
        assert_eq!(session.avatar.as_deref(), Some("fresh.png"));
        assert_eq!(notifier.actions(), vec!["upload-avatar".to_string()]);
    }

    #[tokio::test]
    async fn disconnect_resets_even_when_the_server_fails() {
        let mut session = signed_in().await;
        let notifier = RecordingNotifier::default();

        session
            .disconnect(&MockUserService::new(Outcome::Unreachable), &notifier)
            .await;

        assert_eq!(session, SessionState::default());
        assert_eq!(notifier.actions(), vec!["disconnect".to_string()]);
    }
}
