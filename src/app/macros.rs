/// Register an application factory under an entry point name at program
/// load, before any worker resolves it.
///
/// ```ignore
/// fn mount(cfg: &mut actix_web::web::ServiceConfig) {
///     cfg.route("/", actix_web::web::get().to(index));
/// }
///
/// forklift::register_app!("wsgi:app", mount);
/// ```
#[macro_export]
macro_rules! register_app {
    ($name:expr, $mount:expr) => {
        #[ctor::ctor]
        fn __register_app_plugin() {
            use std::sync::Arc;
            use $crate::app::register::{register_app_plugin, AppFactory};

            register_app_plugin(
                $name,
                Arc::new(|| Ok(Arc::new($mount) as AppFactory)),
            );
        }
    };
}
