//! Named wrappers for common API routes.
//!
//! Each wrapper POSTs its JSON input (pass `json!({})` for none) and returns
//! the JSON response. Read-only routes are marked safe to retry; routes that
//! create or change state are not, so a transport failure is not replayed.

use serde_json::Value;

use super::{call_class, call_object};
use crate::error_handling::RequestError;
use crate::request::ApiClient;

macro_rules! class_route {
    ($(#[$doc:meta])* $name:ident => $class:literal / $method:literal, always_retry = $retry:literal) => {
        $(#[$doc])*
        pub async fn $name(client: &ApiClient, input: Value) -> Result<Value, RequestError> {
            call_class(client, $class, $method, input, $retry).await
        }
    };
}

macro_rules! object_route {
    ($(#[$doc:meta])* $name:ident => $method:literal, always_retry = $retry:literal) => {
        $(#[$doc])*
        pub async fn $name(
            client: &ApiClient,
            object_id: &str,
            input: Value,
        ) -> Result<Value, RequestError> {
            call_object(client, object_id, $method, input, $retry).await
        }
    };
}

// system
class_route!(
    /// `/system/whoami`: ID of the user or job the token belongs to.
    system_whoami => "system" / "whoami", always_retry = true
);
class_route!(
    /// `/system/findDataObjects`
    system_find_data_objects => "system" / "findDataObjects", always_retry = true
);
class_route!(
    /// `/system/findProjects`
    system_find_projects => "system" / "findProjects", always_retry = true
);
class_route!(
    /// `/system/findJobs`
    system_find_jobs => "system" / "findJobs", always_retry = true
);
class_route!(
    /// `/system/describeDataObjects`
    system_describe_data_objects => "system" / "describeDataObjects", always_retry = true
);

// project
class_route!(
    /// `/project/new`
    project_new => "project" / "new", always_retry = false
);
object_route!(
    /// `/<project-id>/describe`
    project_describe => "describe", always_retry = true
);
object_route!(
    /// `/<project-id>/update`
    project_update => "update", always_retry = false
);
object_route!(
    /// `/<project-id>/destroy`
    project_destroy => "destroy", always_retry = false
);
object_route!(
    /// `/<project-id>/newFolder`
    project_new_folder => "newFolder", always_retry = false
);
object_route!(
    /// `/<project-id>/listFolder`
    project_list_folder => "listFolder", always_retry = true
);
object_route!(
    /// `/<project-id>/removeObjects`
    project_remove_objects => "removeObjects", always_retry = false
);

// file
class_route!(
    /// `/file/new`
    file_new => "file" / "new", always_retry = false
);
object_route!(
    /// `/<file-id>/describe`
    file_describe => "describe", always_retry = true
);
object_route!(
    /// `/<file-id>/upload`: URL and headers for uploading one part.
    file_upload => "upload", always_retry = true
);
object_route!(
    /// `/<file-id>/download`: URL for downloading the file contents.
    file_download => "download", always_retry = true
);
object_route!(
    /// `/<file-id>/close`
    file_close => "close", always_retry = false
);

// record
class_route!(
    /// `/record/new`
    record_new => "record" / "new", always_retry = false
);
object_route!(
    /// `/<record-id>/describe`
    record_describe => "describe", always_retry = true
);
object_route!(
    /// `/<record-id>/getDetails`
    record_get_details => "getDetails", always_retry = true
);
object_route!(
    /// `/<record-id>/setDetails`
    record_set_details => "setDetails", always_retry = false
);
object_route!(
    /// `/<record-id>/close`
    record_close => "close", always_retry = false
);

// job
class_route!(
    /// `/job/new`: launches a subjob from inside a running job.
    job_new => "job" / "new", always_retry = false
);
object_route!(
    /// `/<job-id>/describe`
    job_describe => "describe", always_retry = true
);
object_route!(
    /// `/<job-id>/terminate`
    job_terminate => "terminate", always_retry = false
);
