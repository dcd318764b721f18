use super::{GraphBuilder, OpLib, Tensor, TensorMeta, name::Namespace};
use crate::{Arg, Edge, Model, NNError, NeuralNetwork, Node, op::OpError};
use graph::{Graph, GraphTopo, TopoNode};
use log::trace;
use std::{cell::RefCell, ops::Range, rc::Rc};

/// Append-only record of the graph under construction. Cloning is
/// reference-like; all clones share one [`Internal`].
pub struct Context(Rc<RefCell<Internal>>);

impl GraphBuilder {
    /// Runs one network over fresh global inputs and seals the result.
    pub fn build<NN: NeuralNetwork>(
        self,
        nn: NN,
        inputs: impl IntoIterator<Item = TensorMeta>,
    ) -> Result<Model, NNError> {
        let (ctx, inputs) = self.new_context(inputs);
        let outputs = nn.launch(inputs, ctx.clone()).map(|(_, outputs)| outputs)?;
        Ok(ctx.into_graph(outputs))
    }

    fn new_context(self, global_inputs: impl IntoIterator<Item = TensorMeta>) -> (Context, Vec<Tensor>) {
        let tensors = global_inputs
            .into_iter()
            .enumerate()
            .map(|(i, meta)| Tensor_ {
                name: format!("Ω.{i}"),
                meta,
            })
            .collect::<Vec<_>>();
        let n_inputs = tensors.len();
        let ctx = Context(Rc::new(RefCell::new(Internal {
            op_lib: Rc::new(self.op_lib),
            namespace: Namespace::new("Ω"),
            operators: Default::default(),
            tensors,
            n_inputs,
        })));

        let tensors = (0..n_inputs)
            .map(|idx| Tensor {
                idx,
                ctx: ctx.clone(),
            })
            .collect();

        (ctx, tensors)
    }
}

#[derive(Default)]
struct Internal {
    op_lib: Rc<OpLib>,
    namespace: Namespace,
    operators: Vec<Op_>,
    tensors: Vec<Tensor_>,
    n_inputs: usize,
}

struct Op_ {
    name: String,
    op: String,
    arg: Option<Arg>,
    inputs: Box<[usize]>,
    outputs: Range<usize>,
}

struct Tensor_ {
    name: String,
    meta: TensorMeta,
}

impl Context {
    pub fn path(&self) -> String {
        self.0.borrow_mut().namespace.top_mut().path().to_string()
    }

    /// Launches a sub-network in a child name scope.
    pub fn trap<NN: NeuralNetwork>(
        &mut self,
        name: impl ToString,
        nn: NN,
        inputs: impl IntoIterator<Item = Tensor>,
    ) -> Result<Vec<Tensor>, NNError> {
        self.0.borrow_mut().namespace.push(name);
        let outputs = nn
            .launch(inputs, Self(self.0.clone()))
            .map(|(_, outputs)| outputs);
        self.0.borrow_mut().namespace.pop();
        outputs
    }

    /// Appends one operator node, inferring its output metas. An empty
    /// `name` falls back to the op name; duplicates get a trailing serial.
    pub fn call(
        &mut self,
        name: impl ToString,
        op: impl ToString,
        arg: Option<Arg>,
        inputs: impl IntoIterator<Item = Tensor>,
    ) -> Result<Vec<Tensor>, NNError> {
        let mut internal = self.0.borrow_mut();

        let op = op.to_string();
        let mut name = name.to_string();
        if name.is_empty() {
            name = op.clone()
        }
        let top = internal.namespace.top_mut();
        let name = top.operator.decorate(name);
        let name = format!("{}:{}", top.path(), name);

        let Some(infer) = internal.op_lib.get(&op) else {
            return Err(NNError {
                name,
                err: OpError::NotExist,
            });
        };

        let inputs = inputs.into_iter().map(|t| t.idx).collect::<Box<_>>();
        let meta = inputs
            .iter()
            .map(|&idx| internal.tensors[idx].meta.clone())
            .collect::<Vec<_>>();
        let meta = match infer.infer(&meta, arg.as_ref()) {
            Ok(meta) => meta,
            Err(err) => return Err(NNError { name, err }),
        };
        trace!("{name} <- {op} ({} outputs)", meta.len());

        let start = internal.tensors.len();
        internal
            .tensors
            .extend(meta.into_iter().enumerate().map(|(i, meta)| Tensor_ {
                name: format!("{name}.output.{i}"),
                meta,
            }));
        let end = internal.tensors.len();

        internal.operators.push(Op_ {
            name,
            op,
            arg,
            inputs,
            outputs: start..end,
        });

        Ok((start..end)
            .map(|idx| Tensor {
                idx,
                ctx: Self(self.0.clone()),
            })
            .collect())
    }
}

impl Context {
    pub(super) fn clone(&self) -> Self {
        Self(self.0.clone())
    }

    pub(super) fn get_meta(&self, i: usize) -> TensorMeta {
        self.0.borrow().tensors[i].meta.clone()
    }

    fn into_graph(self, global_outputs: Vec<Tensor>) -> Model {
        let Internal {
            operators,
            tensors,
            n_inputs,
            ..
        } = self.0.replace(Internal::default());

        // tensors were created in topological order: global inputs first,
        // then every call's outputs, so tensor indices are edge indices
        let global_outputs = global_outputs
            .into_iter()
            .map(|t| t.idx)
            .collect::<Vec<_>>();
        let n_outputs = global_outputs.len();

        let mut nodes = Vec::with_capacity(operators.len());
        let mut topo_nodes = Vec::with_capacity(operators.len());
        let mut connections =
            Vec::with_capacity(n_outputs + operators.iter().map(|n| n.inputs.len()).sum::<usize>());
        connections.extend(global_outputs);

        for op in operators {
            let Op_ {
                name,
                op,
                arg,
                inputs,
                outputs,
            } = op;
            topo_nodes.push(TopoNode {
                n_inputs: inputs.len(),
                n_outputs: outputs.len(),
            });
            connections.extend(inputs);
            nodes.push(Node { name, op, arg });
        }

        let edges = tensors
            .into_iter()
            .map(|t| Edge {
                name: t.name,
                meta: t.meta,
            })
            .collect();

        Model(Graph {
            topo: GraphTopo::from_raw_parts(
                n_inputs,
                n_outputs,
                connections.into(),
                topo_nodes.into(),
            ),
            nodes: nodes.into(),
            edges,
        })
    }
}
