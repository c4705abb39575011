//! Interfaces of the collaborators that consume descriptors.
//!
//! The engine does not execute commands, talk to a container runtime, or
//! print anything itself. Callers plug implementations of these traits in;
//! the helpers below only sequence calls on them.

use std::fmt::Display;

use shaddock_common::constants::DOCKER_BIN;

use crate::descriptor::ServiceDescriptor;

/// Runs shell commands, locally or on a remote host.
pub trait CommandExecutor {
    /// Error raised by the executor.
    type Error: Display;

    /// Runs `command` and returns its standard output.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be run or fails.
    fn run(&self, command: &str) -> Result<String, Self::Error>;
}

/// Client of a container-runtime API endpoint.
///
/// The endpoint to talk to is the descriptor's `api_cfg`.
pub trait ContainerRuntime {
    /// Error raised by the client.
    type Error: Display;

    /// Pulls the descriptor's image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be pulled.
    fn pull(&self, service: &ServiceDescriptor) -> Result<(), Self::Error>;

    /// Creates a container from the descriptor and returns its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be created.
    fn create(&self, service: &ServiceDescriptor) -> Result<String, Self::Error>;

    /// Starts a created container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be started.
    fn start(&self, service: &ServiceDescriptor, id: &str) -> Result<(), Self::Error>;

    /// Stops a running container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be stopped.
    fn stop(&self, service: &ServiceDescriptor, id: &str) -> Result<(), Self::Error>;
}

/// Sink for everything shown to the user.
pub trait Presenter {
    /// Shows a resolved descriptor.
    fn show_descriptor(&self, service: &ServiceDescriptor);

    /// Shows one line of a runtime progress stream.
    fn show_stream(&self, line: &str);

    /// Shows a status message.
    fn show_message(&self, message: &str);
}

/// The command that builds the descriptor's image from its build context.
#[must_use]
pub fn build_command(service: &ServiceDescriptor) -> String {
    format!(
        "{DOCKER_BIN} build -t {} {}",
        service.tag,
        service.path.display()
    )
}

/// Builds the descriptor's image through `executor`, streaming its output.
///
/// # Errors
///
/// Returns the executor's error.
pub fn build_image<E: CommandExecutor, P: Presenter>(
    executor: &E,
    presenter: &P,
    service: &ServiceDescriptor,
) -> Result<(), E::Error> {
    presenter.show_message(&format!("Building image {} ...", service.tag));
    let output = executor.run(&build_command(service))?;
    for line in output.lines() {
        presenter.show_stream(line);
    }
    Ok(())
}

/// Pulls, creates, and starts the container of `service`.
///
/// Returns the id of the started container.
///
/// # Errors
///
/// Returns the first runtime error; later steps are not attempted.
pub fn start_service<R: ContainerRuntime, P: Presenter>(
    runtime: &R,
    presenter: &P,
    service: &ServiceDescriptor,
) -> Result<String, R::Error> {
    tracing::info!(service = %service.name, url = %service.api_cfg.url, "starting service");
    presenter.show_message(&format!("Pulling {} ...", service.tag));
    runtime.pull(service)?;
    let id = runtime.create(service)?;
    presenter.show_message(&format!("Starting service {} ({id}) ...", service.name));
    runtime.start(service, &id)?;
    Ok(id)
}

/// Stops the container `id` of `service`.
///
/// # Errors
///
/// Returns the runtime error.
pub fn stop_service<R: ContainerRuntime, P: Presenter>(
    runtime: &R,
    presenter: &P,
    service: &ServiceDescriptor,
    id: &str,
) -> Result<(), R::Error> {
    presenter.show_message(&format!("Stopping container {} ...", service.tag));
    runtime.stop(service, id)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use shaddock_common::types::ApiConfig;

    use super::*;

    fn descriptor() -> ServiceDescriptor {
        ServiceDescriptor {
            name: "nova".into(),
            cluster_name: "core".into(),
            tag: "shaddock/nova:latest".into(),
            images_dir: PathBuf::from("/srv/images"),
            path: PathBuf::from("/srv/images/shaddock/nova"),
            host: None,
            ports: Vec::new(),
            port_bindings: Vec::new(),
            volumes: Vec::new(),
            binds: BTreeMap::new(),
            privileged: false,
            network_mode: None,
            api_cfg: ApiConfig::new("tcp://node1:2375"),
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn record(&self, event: &str) -> Result<(), String> {
            self.events.borrow_mut().push(event.to_string());
            if self.fail_on == Some(event) {
                return Err(format!("{event} failed"));
            }
            Ok(())
        }

        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    impl CommandExecutor for Recorder {
        type Error = String;

        fn run(&self, command: &str) -> Result<String, String> {
            self.record(command)?;
            Ok("Step 1/2\nStep 2/2\n".into())
        }
    }

    impl ContainerRuntime for Recorder {
        type Error = String;

        fn pull(&self, _service: &ServiceDescriptor) -> Result<(), String> {
            self.record("pull")
        }

        fn create(&self, _service: &ServiceDescriptor) -> Result<String, String> {
            self.record("create")?;
            Ok("c0ffee".into())
        }

        fn start(&self, _service: &ServiceDescriptor, id: &str) -> Result<(), String> {
            self.record(&format!("start {id}"))
        }

        fn stop(&self, _service: &ServiceDescriptor, id: &str) -> Result<(), String> {
            self.record(&format!("stop {id}"))
        }
    }

    impl Presenter for Recorder {
        fn show_descriptor(&self, service: &ServiceDescriptor) {
            let _ = self.record(&format!("show {}", service.name));
        }

        fn show_stream(&self, line: &str) {
            let _ = self.record(&format!("stream {line}"));
        }

        fn show_message(&self, _message: &str) {}
    }

    #[test]
    fn build_command_uses_tag_and_path() {
        assert_eq!(
            build_command(&descriptor()),
            "docker build -t shaddock/nova:latest /srv/images/shaddock/nova"
        );
    }

    #[test]
    fn build_image_streams_output() {
        let executor = Recorder::default();
        let presenter = Recorder::default();
        build_image(&executor, &presenter, &descriptor()).expect("build");
        assert_eq!(executor.events().len(), 1);
        assert_eq!(presenter.events(), vec!["stream Step 1/2", "stream Step 2/2"]);
    }

    #[test]
    fn start_service_pulls_creates_and_starts() {
        let runtime = Recorder::default();
        let presenter = Recorder::default();
        let id = start_service(&runtime, &presenter, &descriptor()).expect("start");
        assert_eq!(id, "c0ffee");
        assert_eq!(runtime.events(), vec!["pull", "create", "start c0ffee"]);
    }

    #[test]
    fn start_service_stops_at_first_failure() {
        let runtime = Recorder {
            fail_on: Some("pull"),
            ..Recorder::default()
        };
        let presenter = Recorder::default();
        let err = start_service(&runtime, &presenter, &descriptor()).unwrap_err();
        assert_eq!(err, "pull failed");
        assert_eq!(runtime.events(), vec!["pull"]);
    }

    #[test]
    fn stop_service_stops_container() {
        let runtime = Recorder::default();
        let presenter = Recorder::default();
        stop_service(&runtime, &presenter, &descriptor(), "c0ffee").expect("stop");
        assert_eq!(runtime.events(), vec!["stop c0ffee"]);
    }
}
