//! Dracut command line construction.
//!
//! ```text
//! dracut [--force] (--add <module>)* <destination> <kernel_version>
//! ```

use crate::params::InvocationParams;

/// Program executed when nothing else is configured.
pub const DEFAULT_DRACUT_BIN: &str = "dracut";

const FORCE_FLAG: &str = "--force";
const ADD_FLAG: &str = "--add";

/// Build the full argument vector, program first.
///
/// Every module becomes its own `--add <name>` pair; destination and
/// kernel version are always the last two tokens.
pub fn build_command(program: &str, params: &InvocationParams) -> Vec<String> {
    let mut argv = Vec::with_capacity(4 + params.modules.len() * 2);
    argv.push(program.to_string());

    if params.force {
        argv.push(FORCE_FLAG.to_string());
    }

    for module in &params.modules {
        argv.push(ADD_FLAG.to_string());
        argv.push(module.clone());
    }

    argv.push(params.destination.clone());
    argv.push(params.kernel_version.clone());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ModuleList;

    fn params(modules: ModuleList, force: bool) -> InvocationParams {
        InvocationParams::new("/boot/initramfs-5.14.img", "5.14.0-1", modules, force)
    }

    fn seq(names: &[&str]) -> ModuleList {
        ModuleList::Sequence(names.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_force_with_modules() {
        let argv = build_command("dracut", &params(seq(&["nfs", "rdma"]), true));
        assert_eq!(
            argv,
            vec![
                "dracut",
                "--force",
                "--add",
                "nfs",
                "--add",
                "rdma",
                "/boot/initramfs-5.14.img",
                "5.14.0-1"
            ]
        );
    }

    #[test]
    fn test_comma_joined_without_force() {
        let argv = build_command(
            "dracut",
            &params(ModuleList::CommaJoined("nfs,rdma".into()), false),
        );
        assert_eq!(
            argv[1..],
            ["--add", "nfs", "--add", "rdma", "/boot/initramfs-5.14.img", "5.14.0-1"]
        );
    }

    #[test]
    fn test_no_modules() {
        let argv = build_command("dracut", &params(seq(&[]), false));
        assert_eq!(argv, vec!["dracut", "/boot/initramfs-5.14.img", "5.14.0-1"]);

        let argv = build_command("dracut", &params(seq(&[]), true));
        assert_eq!(
            argv,
            vec!["dracut", "--force", "/boot/initramfs-5.14.img", "5.14.0-1"]
        );
    }

    #[test]
    fn test_one_add_pair_per_module() {
        for n in 0..8 {
            let names: Vec<String> = (0..n).map(|i| format!("mod{}", i)).collect();
            let argv = build_command(
                "dracut",
                &params(ModuleList::Sequence(names.clone()), n % 2 == 0),
            );

            let adds: Vec<usize> = argv
                .iter()
                .enumerate()
                .filter(|(_, a)| *a == "--add")
                .map(|(i, _)| i)
                .collect();
            assert_eq!(adds.len(), n);
            for (idx, pos) in adds.iter().enumerate() {
                assert_eq!(argv[pos + 1], names[idx]);
            }

            let len = argv.len();
            assert_eq!(argv[len - 2], "/boot/initramfs-5.14.img");
            assert_eq!(argv[len - 1], "5.14.0-1");
        }
    }

    #[test]
    fn test_force_precedes_every_add() {
        let argv = build_command("dracut", &params(seq(&["a", "b", "c"]), true));
        let forces: Vec<usize> = argv
            .iter()
            .enumerate()
            .filter(|(_, a)| *a == "--force")
            .map(|(i, _)| i)
            .collect();
        let first_add = argv.iter().position(|a| a == "--add").unwrap();

        assert_eq!(forces, vec![1]);
        assert!(forces[0] < first_add);
    }

    #[test]
    fn test_comma_joined_matches_sequence() {
        let joined = build_command(
            "dracut",
            &params(ModuleList::CommaJoined("crypt,lvm,nfs".into()), false),
        );
        let listed = build_command("dracut", &params(seq(&["crypt", "lvm", "nfs"]), false));
        assert_eq!(joined, listed);
    }

    #[test]
    fn test_module_names_are_passed_verbatim() {
        let argv = build_command(
            "dracut",
            &params(ModuleList::CommaJoined("nfs, rdma".into()), false),
        );
        assert_eq!(argv[1..5], ["--add", "nfs", "--add", " rdma"]);
    }

    #[test]
    fn test_custom_program() {
        let argv = build_command("/usr/local/bin/dracut", &params(seq(&[]), false));
        assert_eq!(argv[0], "/usr/local/bin/dracut");
    }
}
