use std::sync::Arc;

use tinyioc::prelude::*;

fn main() {
    let container = Container::init(AppModule::new("greeter")).unwrap();
    let app = container.resolve::<App>().unwrap();
    app.run();
}

struct AppName(&'static str);

struct AppModule {
    app_name: &'static str,
}

impl AppModule {
    fn new(app_name: &'static str) -> Self {
        Self { app_name }
    }
}

impl Module for AppModule {
    fn configure(&self, container: &mut Container) -> Result<(), RegistryError> {
        container.register_shared(Arc::new(AppName(self.app_name)))?;
        container.register_component::<dyn Logger, ConsoleLogger>()?;
        container.register_component::<dyn Greeter, EnglishGreeter>()?;
        container.register_component::<App, App>()?;
        Ok(())
    }
}

trait Logger: Send + Sync + 'static {
    fn log(&self, message: &str);
}

struct ConsoleLogger {
    app_name: &'static str,
}

#[component(dyn Logger)]
impl ConsoleLogger {
    #[inject]
    fn anonymous() -> Self {
        Self { app_name: "?" }
    }

    #[inject]
    fn new(app_name: Arc<AppName>) -> Self {
        Self {
            app_name: app_name.0,
        }
    }
}

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) {
        eprintln!("[{}] {}", self.app_name, message);
    }
}

trait Greeter: Send + Sync + 'static {
    fn greet(&self);
}

struct EnglishGreeter {
    logger: Arc<dyn Logger>,
}

#[component(dyn Greeter)]
impl EnglishGreeter {
    #[inject]
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

impl Greeter for EnglishGreeter {
    fn greet(&self) {
        self.logger.log("Hello World!");
    }
}

struct App {
    logger: Arc<dyn Logger>,
    greeter: Arc<dyn Greeter>,
}

#[component]
impl App {
    #[inject]
    fn new(logger: Arc<dyn Logger>, greeter: Arc<dyn Greeter>) -> Self {
        Self { logger, greeter }
    }

    fn run(&self) {
        self.logger.log("Greeting from tinyioc managed objects:");
        self.greeter.greet();
    }
}
