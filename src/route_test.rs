use super::*;

#[test]
fn route_paths_round_trip() {
    for route in [Route::Login, Route::Register, Route::Dashboard] {
        assert_eq!(Route::from_path(route.path()), Some(route));
    }
}

#[test]
fn root_and_trailing_slash_resolve() {
    assert_eq!(Route::from_path("/"), Some(Route::Login));
    assert_eq!(Route::from_path("/dashboard/"), Some(Route::Dashboard));
    assert_eq!(Route::from_path("/admin"), None);
}

#[test]
fn only_dashboard_requires_session() {
    assert!(Route::Dashboard.requires_session());
    assert!(!Route::Login.requires_session());
    assert!(!Route::Register.requires_session());
}

#[tokio::test]
async fn channel_navigator_forwards_routes_in_order() {
    let (nav, mut rx) = ChannelNavigator::channel();
    nav.navigate(Route::Dashboard);
    nav.navigate(Route::Login);
    assert_eq!(rx.recv().await, Some(Route::Dashboard));
    assert_eq!(rx.recv().await, Some(Route::Login));
}

#[test]
fn channel_navigator_survives_closed_receiver() {
    let (nav, rx) = ChannelNavigator::channel();
    drop(rx);
    nav.navigate(Route::Login);
}
