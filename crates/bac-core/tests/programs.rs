use std::io::Write;

use bac_core::{BacError, BytecodeLoader, NativeRegistry, Variable, VirtualMachine, VmConfig};

// Run a textual program with the standard natives registered.
fn run_source(source: &str) -> (VirtualMachine, Result<(), BacError>) {
    let instructions = BytecodeLoader::load_str(source).expect("load failed");
    let mut vm = VirtualMachine::new(VmConfig::new(), instructions, bac_natives::standard_registry());
    let res = vm.run();
    (vm, res)
}

#[test]
fn end_to_end_declaration() {
    let (mut vm, res) = run_source("1.0\nsi\nfi v\npu x\npu number\npu 5\nff\nvl x\nex\n");
    res.expect("run failed");
    assert_eq!(vm.pop_buffer().unwrap(), "5.000000");
}

#[test]
fn branch_on_buffered_variable() {
    let source = "\
1.0
fi v
pu limit
pu number
pu 10
ff
fi c_s
vl limit
pb
pu 20
ff
fi v
pu verdict
pu string
pu small
ff
ri
fi v
pu verdict
pu string
pu large
ff
rc
vl verdict
";
    let (mut vm, res) = run_source(source);
    res.expect("run failed");
    assert_eq!(vm.pop_buffer().unwrap(), "small");
    assert!(vm.state().reading().frames().is_empty());
}

#[test]
fn loop_terminates_through_write_back() {
    // counter lives in the root scope; every iteration opens a scope,
    // re-declares counter + 1 there, and the teardown writes it back.
    let source = "\
1.0
fi v
pu counter
pu number
pu 0
ff
si
fi f
pu next
vl counter
pb
ff
fi v
pu counter
pu number
pb
ff
sf
fi c_s
vl counter
pb
pu 3
ff
gt 5
rc
vl counter
";
    let instructions = BytecodeLoader::load_str(source).expect("load failed");
    let natives = NativeRegistry::new().with("next", |_, args: &[Variable]| match args {
        [Variable::Number(n)] => Variable::Number(n + 1.0),
        _ => Variable::Number(0.0),
    });
    let mut vm = VirtualMachine::new(VmConfig::new(), instructions, natives);
    vm.run().expect("run failed");
    assert_eq!(vm.variable("counter").unwrap(), &Variable::Number(3.0));
    assert_eq!(vm.pop_buffer().unwrap(), "3.000000");
}

#[test]
fn long_loop_accumulates_native_results() {
    // every iteration leaves one native result buffered and never discards it
    let source = "\
1.0
fi v
pu counter
pu number
pu 0
ff
si
fi f
pu next
vl counter
pb
ff
fi f
pu next
vl counter
pb
ff
fi v
pu counter
pu number
pb
ff
sf
fi c_s
vl counter
pb
pu 1100
ff
gt 5
rc
";
    let instructions = BytecodeLoader::load_str(source).expect("load failed");
    let natives = NativeRegistry::new().with("next", |_, args: &[Variable]| match args {
        [Variable::Number(n)] => Variable::Number(n + 1.0),
        _ => Variable::Number(0.0),
    });
    let mut vm = VirtualMachine::new(VmConfig::new(), instructions, natives);
    vm.run().expect("default config must not cap the buffer");
    assert_eq!(vm.variable("counter").unwrap(), &Variable::Number(1100.0));
    assert_eq!(vm.state().buffer().size(), 1100);
    assert_eq!(vm.pop_buffer().unwrap(), "1100.000000");
}

#[test]
fn console_native_reports_bytes_written() {
    let (mut vm, res) = run_source("1.0\nfi f\npu stdout\npu 1\npu 2\nff\n");
    res.expect("run failed");
    // "1.000000 2.000000"
    assert_eq!(vm.pop_buffer().unwrap(), "17.000000");
}

#[test]
fn typed_declaration_rejects_malformed_literal() {
    let (_, res) = run_source("1.0\nfi v\npu flag\npu bool\npu maybe\nff\n");
    assert!(matches!(res, Err(BacError::VariableType(_))));
}

#[test]
fn dump_serializes_to_json() {
    let (vm, res) = run_source("1.0\nfi v\npu name\npu string\npu bac\nff\nsi\nvl name\n");
    res.expect("run failed");
    let json = serde_json::to_value(vm.dump()).expect("dump must serialize");
    assert_eq!(json["scopes"][0]["name"]["type"], "string");
    assert_eq!(json["scopes"][0]["name"]["value"], "bac");
    assert_eq!(json["buffer"][0], "bac");
    assert_eq!(json["scopes"].as_array().unwrap().len(), 2);
}

#[test]
fn load_file_reads_bytecode() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "1.0").unwrap();
    writeln!(file, "si ; open").unwrap();
    writeln!(file, "ex").unwrap();
    let instructions = BytecodeLoader::load_file(file.path()).expect("load failed");
    assert_eq!(instructions.len(), 2);
    assert_eq!(instructions[0].operation, "si");
    assert_eq!(instructions[0].argument, None);
}

#[test]
fn load_file_reports_version_mismatch() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "3.1").unwrap();
    writeln!(file, "ex").unwrap();
    let err = BytecodeLoader::load_file(file.path()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "version incompatibility: VM running 1.0 bytecode running 3.1"
    );
}
