//! Print the MSBuild invocation for a sample task and integration context.
//!
//! cargo run -p ccbuild-core --example render_command
use ccbuild_core::api::{
    BuildCondition, IntegrationContext, IntegrationStatus, MsBuildTask,
};

fn main() {
    let task = MsBuildTask::builder()
        .project_file("my project.proj")
        .targets("Build;Test")
        .build_args("/p:Configuration=Release /v:minimal")
        .working_directory("src")
        .build();

    let ctx = IntegrationContext {
        project_name: "sample".into(),
        label: "1.0.42".into(),
        working_directory: r"c:\ccnet\sample\work".into(),
        artifact_directory: r"c:\ccnet\sample\artifacts".into(),
        build_condition: BuildCondition::IfModificationExists,
        integration_status: IntegrationStatus::Success,
        last_integration_status: IntegrationStatus::Failure,
    };

    let info = task.process_info(&ctx);
    println!("{} {}", info.executable, info.command_line());
    println!("cwd: {}", info.working_directory);
    println!("timeout: {}s", info.timeout.as_secs());
}
