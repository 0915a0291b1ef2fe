// src/services/trophy_service_tests.rs
//
// SERVICE TESTS: Trophy Unlock Orchestration
//
// PURPOSE:
// - Prove unlock happens exactly once per (user, trophy)
// - Prove notifications fire only for actual inserts
// - Prove unwatching never revokes an earned trophy
// - Prove a stalled aggregator skips the check without failing

#[cfg(test)]
mod unlock_tests {
    use std::sync::Arc;

    use crate::app::LookifyApp;
    use crate::db::{create_in_memory_pool, initialize_database};
    use crate::domain::{Film, TrophyRule, User};
    use crate::events::create_event_bus;
    use crate::repositories::{
        AchievementRepository, NotificationRepository, SqliteAchievementRepository,
        SqliteNotificationRepository,
    };
    use crate::services::{NotificationService, TrophyService};
    use crate::state::{SourceSet, StateAggregator};

    fn add_user(app: &LookifyApp, username: &str) -> i64 {
        app.user_repo.insert(&User::new(username)).unwrap()
    }

    fn add_film(app: &LookifyApp, title: &str, minutes: u32, category: &str) -> i64 {
        app.film_repo
            .insert(&Film::new(title, minutes, category))
            .unwrap()
    }

    fn trophy_id_for(app: &LookifyApp, rule: TrophyRule) -> i64 {
        app.trophy_repo
            .list_all()
            .unwrap()
            .into_iter()
            .find(|t| t.rule == rule)
            .unwrap()
            .id
    }

    #[test]
    fn test_first_watch_unlocks_and_notifies() {
        let app = LookifyApp::in_memory().unwrap();
        let user = add_user(&app, "mario");
        let film = add_film(&app, "Il Padrino", 175, "Drammatico");

        assert!(app.watch.watch_film(user, film).unwrap());

        let first_watch = trophy_id_for(&app, TrophyRule::FirstWatch);
        assert!(app.achievement_repo.is_unlocked(user, first_watch).unwrap());

        let unread = app.notifications.unread_for_user(user).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "Trofeo Sbloccato");
        assert_eq!(unread[0].body, "Complimenti hai sbloccato il trofeo Primo Film!");
    }

    #[test]
    fn test_repeated_check_unlocks_nothing_new() {
        let app = LookifyApp::in_memory().unwrap();
        let user = add_user(&app, "mario");
        let film = add_film(&app, "Film", 90, "Comico");
        app.watch.watch_film(user, film).unwrap();

        // the watch already ran a check; another one finds nothing new
        assert!(app.trophies.check_and_unlock(user).unwrap().is_empty());
        assert_eq!(app.notifications.unread_for_user(user).unwrap().len(), 1);
        assert_eq!(app.achievement_repo.count_for_user(user).unwrap(), 1);
    }

    #[test]
    fn test_unwatch_keeps_earned_trophy() {
        let app = LookifyApp::in_memory().unwrap();
        let user = add_user(&app, "mario");
        let film = add_film(&app, "Film", 90, "Comico");

        app.watch.watch_film(user, film).unwrap();
        assert!(app.watch.unwatch_film(user, film).unwrap());

        let first_watch = trophy_id_for(&app, TrophyRule::FirstWatch);
        assert!(app.achievement_repo.is_unlocked(user, first_watch).unwrap());
        // and a fresh check does not re-announce it
        assert!(app.trophies.check_and_unlock(user).unwrap().is_empty());
    }

    #[test]
    fn test_tenth_follower_unlocks_social() {
        let app = LookifyApp::in_memory().unwrap();
        let followed = add_user(&app, "famoso");

        let social = trophy_id_for(&app, TrophyRule::Social);
        for n in 0..10 {
            let follower = add_user(&app, &format!("fan{}", n));
            app.follows.follow(follower, followed).unwrap();
        }

        assert!(app.achievement_repo.is_unlocked(followed, social).unwrap());

        // 10 follower notifications plus exactly one trophy notification
        let unread = app.notifications.unread_for_user(followed).unwrap();
        let trophy_notes: Vec<_> = unread
            .iter()
            .filter(|n| n.title == "Trofeo Sbloccato")
            .collect();
        assert_eq!(trophy_notes.len(), 1);
        assert_eq!(
            trophy_notes[0].body,
            "Complimenti hai sbloccato il trofeo Sociale!"
        );
        assert_eq!(unread.len(), 11);
    }

    #[test]
    fn test_ten_films_unlock_film_buff() {
        let app = LookifyApp::in_memory().unwrap();
        let user = add_user(&app, "mario");

        for n in 0..10 {
            let film = add_film(&app, &format!("Film {}", n), 30, "Azione");
            app.watch.watch_film(user, film).unwrap();
        }

        let film_buff = trophy_id_for(&app, TrophyRule::FilmBuff);
        assert!(app.achievement_repo.is_unlocked(user, film_buff).unwrap());
    }

    #[test]
    fn test_stalled_state_skips_check_silently() {
        // Wiring with sources that never published: the check must return
        // empty instead of failing the caller
        let pool = Arc::new(create_in_memory_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();
        let sources = SourceSet::new();
        let event_bus = Arc::new(create_event_bus());

        let achievement_repo: Arc<dyn AchievementRepository> = Arc::new(
            SqliteAchievementRepository::new(Arc::clone(&pool), sources.achievements.clone()),
        );
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(
                Arc::clone(&pool),
                sources.notifications.clone(),
                sources.notification_deliveries.clone(),
            ));
        let notifications = Arc::new(NotificationService::new(
            notification_repo,
            Arc::clone(&event_bus),
        ));
        let aggregator = Arc::new(StateAggregator::new(sources));
        let trophies = TrophyService::new(
            Arc::clone(&achievement_repo),
            notifications,
            aggregator,
            event_bus,
        );

        assert!(trophies.check_and_unlock(1).unwrap().is_empty());
        assert_eq!(achievement_repo.count_for_user(1).unwrap(), 0);
    }
}
