// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::thread;

use bytes::Bytes;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Response, Server};
use serde::Serialize;
use tickstore_client::dataset::MultiDataset;
use tickstore_client::proto::{
    FeedKillReply, FeedListReply, FeedStartReply, MultiQueryReply, QueryResult, WriteReply,
};
use tickstore_client::{Client, Error};
use tickstore_columnar::{ColumnArray, DatasetKey, ElementType};

/// The reply envelope as the service encodes it.
#[derive(Serialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<String>,
    id: u64,
}

fn ok_body<T: Serialize>(result: T) -> Vec<u8> {
    rmp_serde::to_vec_named(&Envelope {
        result: Some(result),
        error: None,
        id: 0,
    })
    .unwrap()
}

fn err_body(message: &str) -> Vec<u8> {
    rmp_serde::to_vec_named(&Envelope::<()> {
        result: None,
        error: Some(message.into()),
        id: 0,
    })
    .unwrap()
}

/// Starts a local server answering every request with `body`, and returns a
/// client pointed at it.
fn start_server(body: Vec<u8>) -> Client {
    let body = Bytes::from(body);
    let (addr_tx, addr_rx) = mpsc::channel();
    thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("building runtime");
        rt.block_on(async move {
            let make_service = make_service_fn(move |_conn| {
                let body = body.clone();
                async move {
                    Ok::<_, hyper::Error>(service_fn(move |_req| {
                        let body = body.clone();
                        async move { Ok::<_, hyper::Error>(Response::new(Body::from(body))) }
                    }))
                }
            });
            let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_service);
            addr_tx.send(server.local_addr()).expect("sending addr");
            server.await.expect("server error");
        });
    });
    let addr = addr_rx.recv().expect("receiving addr");
    Client::new(&format!("http://{addr}/")).expect("constructing client")
}

fn query_reply() -> MultiQueryReply {
    let mut arena = Vec::new();
    for i in 0..150 {
        arena.extend_from_slice(&(i as f32).to_le_bytes());
    }
    MultiQueryReply {
        responses: vec![QueryResult {
            result: MultiDataset {
                types: vec![ElementType::F32],
                names: vec!["avg".into()],
                data: vec![Bytes::from(arena)],
                length: 150,
                start_index: [("alpha:series".to_owned(), 0), ("beta:series".to_owned(), 100)]
                    .into(),
                lengths: [("alpha:series".to_owned(), 100), ("beta:series".to_owned(), 50)]
                    .into(),
            },
        }],
    }
}

#[test]
fn query_slices_datasets_from_shared_buffers() {
    let client = start_server(ok_body(query_reply()));
    let map = client.call("Query", Some(&())).unwrap().unwrap();
    assert_eq!(map.len(), 2);

    let alpha = &map[&DatasetKey::new("alpha", "series")];
    assert_eq!(alpha.row_count(), 100);
    let values = alpha.column_as_f32("avg").unwrap();
    assert_eq!((values[0], values[99]), (0.0, 99.0));

    let beta = &map[&DatasetKey::new("beta", "series")];
    assert_eq!(beta.row_count(), 50);
    let values = beta.column_as_f32("avg").unwrap();
    assert_eq!((values[0], values[49]), (100.0, 149.0));
}

#[test]
fn sql_statement_uses_the_query_reply_shape() {
    let client = start_server(ok_body(query_reply()));
    let map = client.call("SQLStatement", Some(&())).unwrap().unwrap();
    assert_eq!(map.len(), 2);
}

#[test]
fn feed_start_synthesizes_a_pid_dataset() {
    let client = start_server(ok_body(FeedStartReply {
        error_text: String::new(),
        pid: 1234,
    }));
    let map = client.call("FeedStart", Some(&())).unwrap().unwrap();
    assert_eq!(map.len(), 1);
    let set = &map[&DatasetKey::sentinel()];
    assert_eq!(set.num_columns(), 1);
    assert_eq!(set.column("pid"), Some(&ColumnArray::I64(vec![1234])));
}

#[test]
fn feed_start_error_text_is_an_error() {
    let client = start_server(ok_body(FeedStartReply {
        error_text: "feeder exploded".into(),
        pid: 0,
    }));
    match client.call("FeedStart", Some(&())) {
        Err(Error::Server(message)) => assert_eq!(message, "feeder exploded"),
        res => panic!("expected Error::Server, got {res:?}"),
    }
}

#[test]
fn feed_list_synthesizes_a_descriptions_dataset() {
    let client = start_server(ok_body(FeedListReply {
        descriptions: vec!["desc1".into(), "desc2".into()],
    }));
    let map = client.call("FeedList", Some(&())).unwrap().unwrap();
    let set = &map[&DatasetKey::sentinel()];
    assert_eq!(
        set.column("descriptions"),
        Some(&ColumnArray::Str(vec!["desc1".into(), "desc2".into()])),
    );
}

#[test]
fn acknowledgement_methods_yield_no_map() {
    let client = start_server(ok_body(FeedKillReply::default()));
    assert!(client.call("FeedKill", Some(&())).unwrap().is_none());

    let client = start_server(ok_body(WriteReply::default()));
    assert!(client.call("Write", Some(&())).unwrap().is_none());
}

#[test]
fn envelope_errors_surface_as_server_errors() {
    let client = start_server(err_body("no such bucket"));
    match client.call("Query", Some(&())) {
        Err(Error::Server(message)) => assert_eq!(message, "no such bucket"),
        res => panic!("expected Error::Server, got {res:?}"),
    }
}

#[test]
fn inconsistent_payloads_fail_the_call() {
    let mut reply = query_reply();
    reply.responses[0].result.lengths.remove("beta:series");
    let client = start_server(ok_body(reply));
    match client.call("Query", Some(&())) {
        Err(Error::Decode(err)) => {
            assert!(err.to_string().contains("beta:series"), "{err}");
        }
        res => panic!("expected Error::Decode, got {res:?}"),
    }
}
