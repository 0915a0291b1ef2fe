// src/services/request_service.rs
//
// Request Service - Catalog Request Workflow
//
// CRITICAL RULES:
// - Submitted content exists immediately but stays invisible
// - Approval flips visibility; it never re-inserts content
// - Rejection removes the content and its links, not just the request
// - The requester is notified of every outcome

use std::sync::Arc;

use crate::domain::{ContentKind, FilmRequest, SeriesRequest};
use crate::error::{AppError, AppResult};
use crate::events::{EventBus, RequestApproved, RequestRejected, RequestSubmitted};
use crate::repositories::{FilmRepository, RequestRepository, SeriesRepository};
use crate::services::{AddContentRequest, CatalogService, NotificationService};

pub struct RequestService {
    request_repo: Arc<dyn RequestRepository>,
    film_repo: Arc<dyn FilmRepository>,
    series_repo: Arc<dyn SeriesRepository>,
    catalog: Arc<CatalogService>,
    notifications: Arc<NotificationService>,
    event_bus: Arc<EventBus>,
}

impl RequestService {
    pub fn new(
        request_repo: Arc<dyn RequestRepository>,
        film_repo: Arc<dyn FilmRepository>,
        series_repo: Arc<dyn SeriesRepository>,
        catalog: Arc<CatalogService>,
        notifications: Arc<NotificationService>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            request_repo,
            film_repo,
            series_repo,
            catalog,
            notifications,
            event_bus,
        }
    }

    /// Submit a film for admin approval
    ///
    /// The film is inserted invisible right away so approval only has to
    /// flip a flag. Returns the request id.
    pub fn submit_film_request(
        &self,
        requester_id: i64,
        approver_id: i64,
        mut content: AddContentRequest,
    ) -> AppResult<i64> {
        content.visible = false;
        let film_id = self.catalog.add_film(content)?;

        let request_id = self.request_repo.insert_film_request(&FilmRequest {
            id: 0,
            film_id,
            requester_id,
            approver_id,
            approved: false,
        })?;

        self.event_bus.emit(RequestSubmitted::new(
            request_id,
            ContentKind::Film,
            requester_id,
        ));

        Ok(request_id)
    }

    /// Approve a pending film request, making the film visible
    pub fn approve_film_request(&self, request_id: i64) -> AppResult<()> {
        let request = self
            .request_repo
            .get_film_request(request_id)?
            .ok_or(AppError::NotFound)?;
        let film = self
            .film_repo
            .get_by_id(request.film_id)?
            .ok_or(AppError::NotFound)?;

        self.request_repo.set_film_approval(request_id, true)?;
        self.film_repo.set_visible(request.film_id, true)?;

        self.notifications.notify(
            request.requester_id,
            "Richiesta Film Approvata",
            &format!("La tua richiesta per il Film {} è stata approvata", film.title),
        )?;
        self.event_bus.emit(RequestApproved::new(
            request_id,
            ContentKind::Film,
            request.requester_id,
        ));

        Ok(())
    }

    /// Reject a pending film request, removing the film entirely
    pub fn reject_film_request(&self, request_id: i64) -> AppResult<()> {
        let request = self
            .request_repo
            .get_film_request(request_id)?
            .ok_or(AppError::NotFound)?;
        let film = self
            .film_repo
            .get_by_id(request.film_id)?
            .ok_or(AppError::NotFound)?;

        self.request_repo.delete_film_request(request_id)?;
        self.catalog.remove_film(request.film_id)?;

        self.notifications.notify(
            request.requester_id,
            "Richiesta Film Rifiutata",
            &format!("La tua richiesta per il Film {} è stata rifiutata", film.title),
        )?;
        self.event_bus.emit(RequestRejected::new(
            request_id,
            ContentKind::Film,
            request.requester_id,
        ));

        Ok(())
    }

    /// Submit a series for admin approval
    pub fn submit_series_request(
        &self,
        requester_id: i64,
        approver_id: i64,
        mut content: AddContentRequest,
    ) -> AppResult<i64> {
        content.visible = false;
        let series_id = self.catalog.add_series(content)?;

        let request_id = self.request_repo.insert_series_request(&SeriesRequest {
            id: 0,
            series_id,
            requester_id,
            approver_id,
            approved: false,
        })?;

        self.event_bus.emit(RequestSubmitted::new(
            request_id,
            ContentKind::Series,
            requester_id,
        ));

        Ok(request_id)
    }

    /// Approve a pending series request, making the series visible
    pub fn approve_series_request(&self, request_id: i64) -> AppResult<()> {
        let request = self
            .request_repo
            .get_series_request(request_id)?
            .ok_or(AppError::NotFound)?;
        let series = self
            .series_repo
            .get_by_id(request.series_id)?
            .ok_or(AppError::NotFound)?;

        self.request_repo.set_series_approval(request_id, true)?;
        self.series_repo.set_visible(request.series_id, true)?;

        self.notifications.notify(
            request.requester_id,
            "Richiesta Serie TV Approvata",
            &format!(
                "La tua richiesta per la Serie {} è stata approvata",
                series.title
            ),
        )?;
        self.event_bus.emit(RequestApproved::new(
            request_id,
            ContentKind::Series,
            request.requester_id,
        ));

        Ok(())
    }

    /// Reject a pending series request, removing the series entirely
    pub fn reject_series_request(&self, request_id: i64) -> AppResult<()> {
        let request = self
            .request_repo
            .get_series_request(request_id)?
            .ok_or(AppError::NotFound)?;
        let series = self
            .series_repo
            .get_by_id(request.series_id)?
            .ok_or(AppError::NotFound)?;

        self.request_repo.delete_series_request(request_id)?;
        self.catalog.remove_series(request.series_id)?;

        self.notifications.notify(
            request.requester_id,
            "Richiesta Serie TV Rifiutata",
            &format!(
                "La tua richiesta per la Serie {} è stata rifiutata",
                series.title
            ),
        )?;
        self.event_bus.emit(RequestRejected::new(
            request_id,
            ContentKind::Series,
            request.requester_id,
        ));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::LookifyApp;
    use crate::domain::User;

    fn app_with_users() -> (LookifyApp, i64, i64) {
        let app = LookifyApp::in_memory().unwrap();
        let requester = app.user_repo.insert(&User::new("mario")).unwrap();
        let mut admin = User::new("admin");
        admin.is_admin = true;
        let approver = app.user_repo.insert(&admin).unwrap();
        (app, requester, approver)
    }

    fn content(title: &str) -> AddContentRequest {
        AddContentRequest {
            title: title.to_string(),
            description: "Un film richiesto".to_string(),
            duration_minutes: 110,
            category: "Azione".to_string(),
            visible: true,
            platforms: vec!["Netflix".to_string()],
            actors: vec![("Toni".to_string(), "Servillo".to_string())],
        }
    }

    #[test]
    fn test_submitted_film_stays_invisible_until_approved() {
        let (app, requester, approver) = app_with_users();

        let request_id = app
            .requests
            .submit_film_request(requester, approver, content("Nuovo Film"))
            .unwrap();

        // submitted as invisible even though the request asked for visible
        assert!(app.film_repo.list_visible().unwrap().is_empty());

        app.requests.approve_film_request(request_id).unwrap();
        assert_eq!(app.film_repo.list_visible().unwrap().len(), 1);
        assert!(app
            .request_repo
            .get_film_request(request_id)
            .unwrap()
            .unwrap()
            .approved);

        let unread = app.notifications.unread_for_user(requester).unwrap();
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].title, "Richiesta Film Approvata");
    }

    #[test]
    fn test_rejected_film_is_removed_with_links() {
        let (app, requester, approver) = app_with_users();

        let request_id = app
            .requests
            .submit_film_request(requester, approver, content("Film Scadente"))
            .unwrap();
        let film_id = app
            .request_repo
            .get_film_request(request_id)
            .unwrap()
            .unwrap()
            .film_id;

        app.requests.reject_film_request(request_id).unwrap();

        assert!(app.request_repo.get_film_request(request_id).unwrap().is_none());
        assert!(app.film_repo.get_by_id(film_id).unwrap().is_none());
        assert!(app.platform_repo.list_film_links().unwrap().is_empty());
        assert!(app.cast_repo.list_film_links().unwrap().is_empty());

        let unread = app.notifications.unread_for_user(requester).unwrap();
        assert_eq!(unread[0].title, "Richiesta Film Rifiutata");
    }

    #[test]
    fn test_series_request_approval_flow() {
        let (app, requester, approver) = app_with_users();

        let request_id = app
            .requests
            .submit_series_request(requester, approver, content("Nuova Serie"))
            .unwrap();

        app.requests.approve_series_request(request_id).unwrap();
        assert_eq!(app.series_repo.list_visible().unwrap().len(), 1);

        let unread = app.notifications.unread_for_user(requester).unwrap();
        assert_eq!(unread[0].title, "Richiesta Serie TV Approvata");
    }
}
