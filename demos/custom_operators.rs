use funct_rs::ast::{Parser, Precedence};

fn main() {
    pretty_env_logger::init();

    let mut parser = Parser::standard().unwrap();
    parser.set_variable_name("t").unwrap();
    parser
        .add_operator('%', |a, b| a.rem_euclid(b), Precedence::MulExp)
        .unwrap();
    parser.add_function("abs", f64::abs).unwrap();
    parser
        .add_function("sigmoid", |v| 1.0 / (1.0 + (-v).exp()))
        .unwrap();

    let ast = parser.parse("sigmoid(abs t % 3 - 1)").unwrap();
    println!("{}", ast);
    for t in [-4.0, -1.0, 0.0, 2.5, 7.0] {
        println!("t = {:>4}: {}", t, ast.eval(t).unwrap());
    }
}
