pub mod threaded_session;
